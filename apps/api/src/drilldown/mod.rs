//! Per-KPI drill-down: monthly trend, categorical breakdown, the matching
//! headcount summaries and two KPI-focused insight cards.

pub mod handlers;
pub mod kpi;
pub mod series;
