//! Statistics Calculator Module
//! Descriptive statistics over every numeric column of a table, plus the
//! head-rows preview shown for each season.

use crate::data::table::{format_cell, numeric_columns, present_values};
use polars::prelude::*;
use statrs::statistics::Statistics;

/// Row labels of a describe table, in display order.
pub const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary of a single numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Values in `DESCRIBE_ROWS` order.
    pub fn row_values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.median,
            self.p75,
            self.max,
        ]
    }
}

/// Descriptive statistics for every numeric column of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeTable {
    pub summaries: Vec<ColumnSummary>,
}

impl DescribeTable {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.summaries.iter().find(|s| s.column == name)
    }
}

/// First rows of a table rendered as text, for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl TablePreview {
    pub fn head(df: &DataFrame, n: usize) -> Self {
        let head = df.head(Some(n));
        let columns = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|col| {
                        col.get(i)
                            .map(|v| format_cell(&v))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self {
            columns,
            rows,
            total_rows: df.height(),
        }
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summarise every numeric column, in table order.
    pub fn describe(df: &DataFrame) -> DescribeTable {
        let summaries = numeric_columns(df)
            .iter()
            .map(|column| {
                let values = present_values(df, column);
                Self::summarize(column, &values)
            })
            .collect();

        DescribeTable { summaries }
    }

    /// Summary of one column's non-null values.
    pub fn summarize(column: &str, values: &[f64]) -> ColumnSummary {
        if values.is_empty() {
            return ColumnSummary::empty(column);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnSummary {
            column: column.to_string(),
            count: values.len(),
            mean: Statistics::mean(values),
            // Sample standard deviation; NaN for a single value.
            std: Statistics::std_dev(values),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[sorted.len() - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_matches_pandas_for_simple_column() {
        let df = df!(
            "team" => ["T1", "T2", "T3", "T4"],
            "kills" => [1i64, 2, 3, 4],
        )
        .unwrap();

        let table = StatsCalculator::describe(&df);
        assert_eq!(table.summaries.len(), 1);

        let kills = table.column("kills").unwrap();
        assert_eq!(kills.count, 4);
        assert!(approx(kills.mean, 2.5));
        assert!(approx(kills.std, 1.2909944487358056));
        assert!(approx(kills.min, 1.0));
        assert!(approx(kills.p25, 1.75));
        assert!(approx(kills.median, 2.5));
        assert!(approx(kills.p75, 3.25));
        assert!(approx(kills.max, 4.0));
    }

    #[test]
    fn nulls_are_excluded_from_count() {
        let df = df!("winrate" => [Some(0.5f64), None, Some(1.0)]).unwrap();
        let summary = StatsCalculator::describe(&df).summaries.remove(0);
        assert_eq!(summary.count, 2);
        assert!(approx(summary.mean, 0.75));
    }

    #[test]
    fn empty_table_yields_nan_summaries() {
        let df = df!("kills" => Vec::<f64>::new()).unwrap();
        let summary = StatsCalculator::describe(&df).summaries.remove(0);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.max.is_nan());
    }

    #[test]
    fn text_only_table_has_no_summaries() {
        let df = df!("team" => ["T1", "T2"], "position" => ["top", "mid"]).unwrap();
        assert!(StatsCalculator::describe(&df).is_empty());
    }

    #[test]
    fn single_value_has_undefined_std() {
        let summary = StatsCalculator::summarize("kd", &[2.0]);
        assert_eq!(summary.count, 1);
        assert!(summary.std.is_nan());
        assert!(approx(summary.p75, 2.0));
    }

    #[test]
    fn head_preview_limits_rows() {
        let df = df!(
            "team" => ["T1", "T2", "T3"],
            "kills" => [1i64, 2, 3],
        )
        .unwrap();

        let preview = TablePreview::head(&df, 2);
        assert_eq!(preview.columns, vec!["team", "kills"]);
        assert_eq!(preview.rows, vec![vec!["T1", "1"], vec!["T2", "2"]]);
        assert_eq!(preview.total_rows, 3);
    }
}
