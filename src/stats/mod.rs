//! Statistics module - descriptive statistics and grouped aggregation

pub mod aggregate;
pub mod calculator;

pub use aggregate::{
    correlation_matrix, mean_by_category, mean_by_two_keys, weather_correlation, Correlation,
    FieldSet, Mean,
};
pub use calculator::{BoxSummary, GroupStats, StatsCalculator};
