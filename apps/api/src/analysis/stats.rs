//! Small-sample statistics used by the partition analysis.

use std::collections::HashSet;
use std::hash::Hash;

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::analysis::AnalysisError;

/// Keeps the t statistic finite when the fit is perfect (|r| = 1).
const TINY: f64 = 1.0e-20;

/// Ordinary least-squares fit of y on x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis slope = 0.
    pub p_value: f64,
}

pub fn mean(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyPartition);
    }
    let value = values.iter().sum::<f64>() / values.len() as f64;
    ensure_finite("mean", value)
}

/// Standard deviation with denominator n.
pub fn population_std_dev(values: &[f64]) -> Result<f64, AnalysisError> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    ensure_finite("standard deviation", variance.sqrt())
}

/// Standard score of every value (zero mean, unit variance).
pub fn z_scores(values: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let m = mean(values)?;
    let sd = population_std_dev(values)?;
    if sd == 0.0 {
        return Err(AnalysisError::Degenerate(
            "z-score of a constant column".to_string(),
        ));
    }
    Ok(values.iter().map(|v| (v - m) / sd).collect())
}

pub fn distinct_count<T: Eq + Hash>(values: impl IntoIterator<Item = T>) -> usize {
    values.into_iter().collect::<HashSet<_>>().len()
}

/// Least-squares regression with a Student-t test on the slope (n - 2 dof).
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Result<LinearFit, AnalysisError> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::Degenerate(format!(
            "regression inputs differ in length ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }
    let n = xs.len();
    if n < 3 {
        return Err(AnalysisError::Degenerate(format!(
            "regression needs at least 3 points, got {n}"
        )));
    }

    let x_mean = mean(xs)?;
    let y_mean = mean(ys)?;

    let (mut ss_x, mut ss_y, mut ss_xy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        ss_x += dx * dx;
        ss_y += dy * dy;
        ss_xy += dx * dy;
    }
    if ss_x == 0.0 {
        return Err(AnalysisError::Degenerate(
            "regression on a constant x column".to_string(),
        ));
    }

    let slope = ss_xy / ss_x;
    let intercept = y_mean - slope * x_mean;
    let r_value = if ss_y == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0)
    };

    let dof = (n - 2) as f64;
    let t = r_value * (dof / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| AnalysisError::Statistics(format!("t distribution: {e}")))?;
    let p_value = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);

    Ok(LinearFit {
        slope: ensure_finite("slope", slope)?,
        intercept: ensure_finite("intercept", intercept)?,
        r_value,
        p_value: ensure_finite("p-value", p_value)?,
    })
}

fn ensure_finite(metric: &'static str, value: f64) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::NonFinite { metric })
    }
}
