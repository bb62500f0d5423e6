pub mod aggregates;
pub mod filters;
pub mod handlers;
