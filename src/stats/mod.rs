//! Stats module - descriptive statistics, distributions and season comparisons

pub mod aggregator;
mod calculator;
pub mod histogram;

pub use aggregator::{compare_positions, compare_team_metrics, ComparisonTable, TeamMetricComparison};
pub use calculator::{DescribeTable, StatsCalculator, TablePreview, DESCRIBE_ROWS};
pub use histogram::Distribution;
