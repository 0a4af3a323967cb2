//! Season Aggregator Module
//! Per-position attribute means and team metric means, merged into two-season
//! comparison tables.
//!
//! Missing data is zero-filled: a position seen in only one season, or an
//! attribute absent from one season's table, shows 0 for the other season.
//! A zero cell therefore cannot be told apart from a true zero average.

use crate::config::SeasonLabels;
use crate::data::filter::POSITION_COLUMN;
use crate::data::table::{has_column, is_numeric_column};
use polars::prelude::*;

/// Player attributes averaged per position.
pub const ATTRIBUTE_COLUMNS: [&str; 4] = ["kills", "deaths", "assists", "gold_per_minute"];

/// Team metrics compared across seasons.
pub const TEAM_METRIC_COLUMNS: [&str; 7] = [
    "games_played",
    "wins",
    "loses",
    "average_game_duration",
    "kills",
    "deaths",
    "kd",
];

/// A category-indexed table of numbers, one column per series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    pub index_name: String,
    pub index: Vec<String>,
    pub columns: Vec<String>,
    /// Row-major: `values[row][column]`.
    pub values: Vec<Vec<f64>>,
}

impl ComparisonTable {
    /// Read a frame whose `index_name` column holds the categories and whose
    /// other columns hold the series. Nulls read as 0.
    pub fn from_frame(df: &DataFrame, index_name: &str) -> PolarsResult<Self> {
        let index = df
            .column(index_name)?
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect();

        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != index_name)
            .map(|name| name.to_string())
            .collect();

        let mut values = vec![Vec::with_capacity(columns.len()); df.height()];
        for name in &columns {
            let series = df.column(name)?.cast(&DataType::Float64)?;
            for (row, v) in series.f64()?.into_iter().enumerate() {
                values[row].push(v.unwrap_or(0.0));
            }
        }

        Ok(Self {
            index_name: index_name.to_string(),
            index,
            columns,
            values,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[cfg(test)]
    pub fn value(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.index.iter().position(|i| i == row)?;
        let c = self.columns.iter().position(|name| name == column)?;
        self.values.get(r)?.get(c).copied()
    }
}

/// Team metric means for both seasons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamMetricComparison {
    /// Index = the restricted metric list, columns = the two season labels.
    pub table: ComparisonTable,
    /// Restricted metrics absent or non-numeric in season B (zero-filled there).
    pub missing_in_b: Vec<String>,
}

/// Name of a season's copy of an attribute column.
pub fn season_column(attribute: &str, label: &str) -> String {
    format!("{}_{}", attribute, label)
}

/// The column as Float64, or an all-null Float64 when it is absent or not numeric.
fn numeric_or_null(df: &DataFrame, column: &str) -> Expr {
    if is_numeric_column(df, column) {
        col(column).cast(DataType::Float64)
    } else {
        lit(NULL).cast(DataType::Float64)
    }
}

/// Group a table by position and average each attribute per group, naming
/// the results `<attribute>_<label>`. Rows without a position are dropped;
/// nulls are skipped, and an attribute with no values in a group is null.
pub fn position_means(df: &DataFrame, attributes: &[&str], label: &str) -> LazyFrame {
    let position = if has_column(df, POSITION_COLUMN) {
        col(POSITION_COLUMN).cast(DataType::String)
    } else {
        lit(NULL).cast(DataType::String)
    };

    let mut inputs = vec![position.alias(POSITION_COLUMN)];
    inputs.extend(attributes.iter().map(|attr| numeric_or_null(df, attr).alias(*attr)));

    let means: Vec<Expr> = attributes
        .iter()
        .map(|attr| col(*attr).mean().alias(season_column(attr, label)))
        .collect();

    df.clone()
        .lazy()
        .select(inputs)
        .filter(col(POSITION_COLUMN).is_not_null())
        .group_by([col(POSITION_COLUMN)])
        .agg(means)
}

/// Full outer join of two per-season group results on `key`. Keys missing on
/// one side are zero-filled there; rows are sorted by key, and the value
/// columns keep season A's before season B's.
pub fn outer_join_means(a: LazyFrame, b: LazyFrame, key: &str) -> PolarsResult<DataFrame> {
    a.join(
        b,
        [col(key)],
        [col(key)],
        JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
    )
    .with_columns([col("*").exclude([key]).fill_null(lit(0.0))])
    .sort([key], SortMultipleOptions::default())
    .collect()
}

/// Compare per-position attribute means between two filtered player tables.
/// `None` when neither season has a position column.
pub fn compare_positions(
    a: &DataFrame,
    b: &DataFrame,
    labels: &SeasonLabels,
) -> PolarsResult<Option<ComparisonTable>> {
    if !has_column(a, POSITION_COLUMN) && !has_column(b, POSITION_COLUMN) {
        return Ok(None);
    }

    let joined = outer_join_means(
        position_means(a, &ATTRIBUTE_COLUMNS, &labels.a),
        position_means(b, &ATTRIBUTE_COLUMNS, &labels.b),
        POSITION_COLUMN,
    )?;
    ComparisonTable::from_frame(&joined, POSITION_COLUMN).map(Some)
}

/// Candidate metrics present and numeric in the reference table, in candidate order.
pub fn restricted_metrics(reference: &DataFrame) -> Vec<String> {
    TEAM_METRIC_COLUMNS
        .iter()
        .filter(|metric| is_numeric_column(reference, metric))
        .map(|metric| metric.to_string())
        .collect()
}

/// One-row frame of each metric's mean; absent or empty metrics read 0.
fn metric_means(df: &DataFrame, metrics: &[String]) -> PolarsResult<DataFrame> {
    let means: Vec<Expr> = metrics
        .iter()
        .map(|metric| {
            numeric_or_null(df, metric)
                .mean()
                .fill_null(lit(0.0))
                .alias(metric.as_str())
        })
        .collect();
    df.clone().lazy().select(means).collect()
}

fn first_value(df: &DataFrame, column: &str) -> PolarsResult<f64> {
    Ok(df.column(column)?.f64()?.get(0).unwrap_or(0.0))
}

/// Compare team metric means. The metric list is decided by season A alone;
/// a metric missing in season B is zero-filled and reported.
pub fn compare_team_metrics(
    a: &DataFrame,
    b: &DataFrame,
    labels: &SeasonLabels,
) -> PolarsResult<TeamMetricComparison> {
    let metrics = restricted_metrics(a);
    if metrics.is_empty() {
        return Ok(TeamMetricComparison {
            table: ComparisonTable {
                index_name: "metric".to_string(),
                columns: vec![labels.a.clone(), labels.b.clone()],
                ..Default::default()
            },
            missing_in_b: Vec::new(),
        });
    }

    let means_a = metric_means(a, &metrics)?;
    let means_b = metric_means(b, &metrics)?;

    let missing_in_b: Vec<String> = metrics
        .iter()
        .filter(|metric| !is_numeric_column(b, metric))
        .cloned()
        .collect();
    if !missing_in_b.is_empty() {
        log::warn!(
            "Team metrics missing in season {}: {}",
            labels.b,
            missing_in_b.join(", ")
        );
    }

    let values = metrics
        .iter()
        .map(|metric| Ok(vec![first_value(&means_a, metric)?, first_value(&means_b, metric)?]))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok(TeamMetricComparison {
        table: ComparisonTable {
            index_name: "metric".to_string(),
            index: metrics,
            columns: vec![labels.a.clone(), labels.b.clone()],
            values,
        },
        missing_in_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> SeasonLabels {
        SeasonLabels {
            a: "2020".into(),
            b: "2022".into(),
        }
    }

    #[test]
    fn means_per_position_skip_nulls() {
        let df = df!(
            "position" => [Some("top"), Some("top"), Some("mid"), None],
            "kills" => [Some(2.0f64), Some(4.0), None, Some(9.0)],
            "deaths" => [1i64, 3, 5, 9],
        )
        .unwrap();

        let means = position_means(&df, &ATTRIBUTE_COLUMNS, "2020")
            .sort(["position"], SortMultipleOptions::default())
            .collect()
            .unwrap();
        assert_eq!(means.height(), 2);

        let kills = means.column("kills_2020").unwrap().f64().unwrap();
        assert_eq!(kills.get(0), None);
        assert_eq!(kills.get(1), Some(3.0));
        let deaths = means.column("deaths_2020").unwrap().f64().unwrap();
        assert_eq!(deaths.get(0), Some(5.0));
        assert_eq!(deaths.get(1), Some(2.0));
        assert_eq!(means.column("assists_2020").unwrap().null_count(), 2);
    }

    #[test]
    fn text_attribute_counts_as_missing() {
        let a = df!("position" => ["top"], "kills" => ["three"]).unwrap();
        let b = df!("position" => ["top"], "kills" => [5i64]).unwrap();

        let table = compare_positions(&a, &b, &labels()).unwrap().unwrap();
        assert_eq!(table.value("top", "kills_2020"), Some(0.0));
        assert_eq!(table.value("top", "kills_2022"), Some(5.0));
    }

    #[test]
    fn outer_join_keeps_positions_from_both_seasons() {
        let a = df!(
            "position" => ["top", "mid"],
            "kills" => [4.0f64, 6.0],
            "deaths" => [1.0f64, 2.0],
            "assists" => [3.0f64, 5.0],
            "gold_per_minute" => [300.0f64, 400.0],
        )
        .unwrap();
        let b = df!(
            "position" => ["mid", "bottom"],
            "kills" => [8.0f64, 10.0],
            "deaths" => [2.0f64, 3.0],
            "assists" => [4.0f64, 6.0],
            "gold_per_minute" => [410.0f64, 450.0],
        )
        .unwrap();

        let table = compare_positions(&a, &b, &labels()).unwrap().unwrap();
        assert_eq!(table.index, vec!["bottom", "mid", "top"]);
        assert_eq!(table.columns.len(), 8);
        assert_eq!(table.columns[0], "kills_2020");
        assert_eq!(table.columns[4], "kills_2022");

        for attr in ATTRIBUTE_COLUMNS {
            assert_eq!(table.value("top", &format!("{attr}_2022")), Some(0.0));
            assert_eq!(table.value("bottom", &format!("{attr}_2020")), Some(0.0));
        }
        assert_eq!(table.value("top", "kills_2020"), Some(4.0));
        assert_eq!(table.value("bottom", "kills_2022"), Some(10.0));
        assert_eq!(table.value("mid", "gold_per_minute_2020"), Some(400.0));
        assert_eq!(table.value("mid", "gold_per_minute_2022"), Some(410.0));
    }

    #[test]
    fn missing_attribute_is_zero_filled() {
        let a = df!("position" => ["top"], "kills" => [3i64]).unwrap();
        let b = df!("position" => ["top"], "kills" => [5i64], "assists" => [7i64]).unwrap();

        let table = compare_positions(&a, &b, &labels()).unwrap().unwrap();
        assert_eq!(table.value("top", "assists_2020"), Some(0.0));
        assert_eq!(table.value("top", "assists_2022"), Some(7.0));
        assert_eq!(table.value("top", "kills_2022"), Some(5.0));
    }

    #[test]
    fn no_position_column_means_no_comparison() {
        let a = df!("kills" => [1i64]).unwrap();
        let b = df!("kills" => [2i64]).unwrap();
        assert!(compare_positions(&a, &b, &labels()).unwrap().is_none());

        let with_position = df!("position" => ["top"], "kills" => [2i64]).unwrap();
        let table = compare_positions(&a, &with_position, &labels()).unwrap().unwrap();
        assert_eq!(table.index, vec!["top"]);
        assert_eq!(table.value("top", "kills_2020"), Some(0.0));
    }

    #[test]
    fn team_metrics_restricted_by_first_season() {
        let a = df!(
            "team" => ["T1", "G2"],
            "wins" => [10i64, 6],
            "loses" => ["x", "y"],
            "kd" => [1.5f64, 0.5],
        )
        .unwrap();
        let b = df!(
            "team" => ["T1", "G2"],
            "wins" => [8i64, 4],
            "games_played" => [12i64, 12],
        )
        .unwrap();

        let comparison = compare_team_metrics(&a, &b, &labels()).unwrap();
        let table = &comparison.table;
        assert_eq!(table.index, vec!["wins", "kd"]);
        assert_eq!(table.columns, vec!["2020", "2022"]);
        assert_eq!(table.value("wins", "2020"), Some(8.0));
        assert_eq!(table.value("wins", "2022"), Some(6.0));
        assert_eq!(table.value("kd", "2020"), Some(1.0));
        assert_eq!(table.value("kd", "2022"), Some(0.0));
        assert_eq!(comparison.missing_in_b, vec!["kd"]);
    }

    #[test]
    fn team_metrics_of_empty_second_season_are_zero() {
        let a = df!("team" => ["T1"], "wins" => [4i64]).unwrap();
        let b = df!("team" => Vec::<String>::new(), "wins" => Vec::<i64>::new()).unwrap();

        let comparison = compare_team_metrics(&a, &b, &labels()).unwrap();
        assert_eq!(comparison.table.value("wins", "2020"), Some(4.0));
        assert_eq!(comparison.table.value("wins", "2022"), Some(0.0));
        assert!(comparison.missing_in_b.is_empty());
    }
}
