//! Query-string parameters and their validation.
//!
//! The dashboard sends blank strings for cleared dropdowns, so every textual
//! parameter treats "" as absent.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::store::{DrilldownScope, HiringFilter, Page};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub business_group: Option<String>,
    pub function: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// `GET /hirings` takes filters and paging in one query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HiringsParams {
    pub business_group: Option<String>,
    pub function: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeParams {
    pub business_group: Option<String>,
    pub function: Option<String>,
}

impl FilterParams {
    pub fn into_filter(self) -> Result<HiringFilter, AppError> {
        let start_date = parse_date("start_date", self.start_date)?;
        let end_date = parse_date("end_date", self.end_date)?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::Validation(format!(
                    "start_date ({start}) must not be after end_date ({end})"
                )));
            }
        }

        Ok(HiringFilter {
            business_group: non_blank(self.business_group),
            function: non_blank(self.function),
            start_date,
            end_date,
        })
    }
}

impl PageParams {
    pub fn into_page(self) -> Result<Page, AppError> {
        let defaults = Page::default();
        let page = Page {
            skip: self.skip.unwrap_or(defaults.skip),
            limit: self.limit.unwrap_or(defaults.limit),
        };
        if page.skip < 0 || page.limit < 0 {
            return Err(AppError::Validation(
                "skip and limit must not be negative".to_string(),
            ));
        }
        Ok(page)
    }
}

impl HiringsParams {
    pub fn into_parts(self) -> Result<(HiringFilter, Page), AppError> {
        let page = PageParams {
            skip: self.skip,
            limit: self.limit,
        }
        .into_page()?;
        let filter = FilterParams {
            business_group: self.business_group,
            function: self.function,
            start_date: self.start_date,
            end_date: self.end_date,
        }
        .into_filter()?;
        Ok((filter, page))
    }
}

impl ScopeParams {
    pub fn into_scope(self) -> DrilldownScope {
        DrilldownScope {
            business_group: non_blank(self.business_group),
            function: non_blank(self.function),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be a YYYY-MM-DD date, got '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: &str, end: &str) -> FilterParams {
        FilterParams {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_strings_are_absent() {
        let filter = FilterParams {
            business_group: Some("".to_string()),
            function: Some("  ".to_string()),
            start_date: Some("".to_string()),
            end_date: None,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, HiringFilter::default());
    }

    #[test]
    fn test_dates_are_parsed() {
        let filter = params("2025-01-01", "2025-06-30").into_filter().unwrap();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.end_date, NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn test_same_day_range_is_valid() {
        assert!(params("2025-03-01", "2025-03-01").into_filter().is_ok());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = params("2025-06-30", "2025-01-01").into_filter().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = params("01/02/2025", "2025-01-01").into_filter().unwrap_err();
        assert!(err.to_string().contains("start_date"));
    }

    #[test]
    fn test_page_defaults_and_negatives() {
        assert_eq!(PageParams::default().into_page().unwrap(), Page::default());
        let negative = PageParams {
            skip: Some(-1),
            limit: None,
        };
        assert!(negative.into_page().is_err());
    }

    #[test]
    fn test_scope_trims_values() {
        let scope = ScopeParams {
            business_group: Some(" Tech ".to_string()),
            function: Some(String::new()),
        }
        .into_scope();
        assert_eq!(scope.business_group.as_deref(), Some("Tech"));
        assert_eq!(scope.function, None);
    }
}
