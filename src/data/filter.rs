//! Team / position filter
//! Equality predicates over a player table. Each criterion is optional: the
//! "all" sentinel or an absent column leaves the rows untouched.

use super::table::{has_column, unique_values};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

/// Sentinel value meaning "do not restrict on this criterion".
pub const ALL_SENTINEL: &str = "all";

pub const TEAM_COLUMN: &str = "team";
pub const POSITION_COLUMN: &str = "position";

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Filter failed: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One filter choice: everything, or a single value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Criterion {
    #[default]
    All,
    Value(String),
}

impl Criterion {
    pub fn is_all(&self) -> bool {
        matches!(self, Criterion::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Criterion::All => None,
            Criterion::Value(v) => Some(v),
        }
    }
}

impl From<&str> for Criterion {
    fn from(value: &str) -> Self {
        if value == ALL_SENTINEL {
            Criterion::All
        } else {
            Criterion::Value(value.to_string())
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::All => f.write_str(ALL_SENTINEL),
            Criterion::Value(v) => f.write_str(v),
        }
    }
}

/// The user's team and position selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub team: Criterion,
    pub position: Criterion,
}

impl FilterCriteria {
    pub fn new(team: impl Into<Criterion>, position: impl Into<Criterion>) -> Self {
        Self {
            team: team.into(),
            position: position.into(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.team.is_all() && self.position.is_all()
    }
}

/// Selectable choices for the two filter controls, sentinel first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub teams: Vec<Criterion>,
    pub positions: Vec<Criterion>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            teams: vec![Criterion::All],
            positions: vec![Criterion::All],
        }
    }
}

/// Build the filter choices from a table's distinct team and position values.
pub fn filter_options(df: &DataFrame) -> FilterOptions {
    let choices = |column: &str| {
        std::iter::once(Criterion::All)
            .chain(unique_values(df, column).into_iter().map(Criterion::Value))
            .collect()
    };

    FilterOptions {
        teams: choices(TEAM_COLUMN),
        positions: choices(POSITION_COLUMN),
    }
}

/// Keep the rows matching every active criterion. Row order and columns are
/// preserved; the input table is never modified.
pub fn apply_filters(df: &DataFrame, criteria: &FilterCriteria) -> Result<DataFrame, FilterError> {
    let predicate = [
        (TEAM_COLUMN, &criteria.team),
        (POSITION_COLUMN, &criteria.position),
    ]
    .into_iter()
    .filter_map(|(column, criterion)| {
        let value = criterion.value()?;
        has_column(df, column).then(|| col(column).cast(DataType::String).eq(lit(value)))
    })
    .reduce(|acc, expr| acc.and(expr));

    let Some(predicate) = predicate else {
        return Ok(df.clone());
    };

    let filtered = df.clone().lazy().filter(predicate).collect()?;
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> DataFrame {
        df!(
            "team" => ["T1", "T2", "T1", "G2", "T1"],
            "position" => ["top", "jungle", "mid", "top", "top"],
            "kills" => [3i64, 5, 7, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn sentinel_parses_to_all() {
        assert_eq!(Criterion::from("all"), Criterion::All);
        assert_eq!(Criterion::from("T1"), Criterion::Value("T1".into()));
        assert_eq!(Criterion::All.to_string(), "all");
    }

    #[test]
    fn all_all_is_identity() {
        let df = players();
        let out = apply_filters(&df, &FilterCriteria::new("all", "all")).unwrap();
        assert!(out.equals_missing(&df));
    }

    #[test]
    fn missing_team_column_ignores_team_criterion() {
        let df = df!("position" => ["top", "mid"], "kills" => [1i64, 2]).unwrap();
        let out = apply_filters(&df, &FilterCriteria::new("T1", "all")).unwrap();
        assert!(out.equals_missing(&df));
    }

    #[test]
    fn team_filter_keeps_only_matching_rows_in_order() {
        let df = players();
        let out = apply_filters(&df, &FilterCriteria::new("T1", "all")).unwrap();

        assert_eq!(out.height(), 3);
        let teams = crate::data::table::text_values(&out, "team").unwrap();
        assert!(teams.iter().all(|t| t.as_deref() == Some("T1")));
        let kills = crate::data::table::present_values(&out, "kills");
        assert_eq!(kills, vec![3.0, 7.0, 2.0]);
        assert_eq!(out.width(), df.width());
        // input untouched
        assert_eq!(df.height(), 5);
    }

    #[test]
    fn criteria_compose_with_and() {
        let out = apply_filters(&players(), &FilterCriteria::new("T1", "top")).unwrap();
        assert_eq!(out.height(), 2);

        let none = apply_filters(&players(), &FilterCriteria::new("T2", "top")).unwrap();
        assert_eq!(none.height(), 0);
    }

    #[test]
    fn numeric_team_column_is_compared_as_text() {
        let df = df!("team" => [1i64, 2, 1], "kills" => [1i64, 2, 3]).unwrap();
        let out = apply_filters(&df, &FilterCriteria::new("1", "all")).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn options_start_with_sentinel() {
        let options = filter_options(&players());
        assert_eq!(
            options.teams,
            vec![
                Criterion::All,
                Criterion::Value("T1".into()),
                Criterion::Value("T2".into()),
                Criterion::Value("G2".into()),
            ]
        );
        assert_eq!(options.positions.len(), 4);

        let bare = df!("kills" => [1i64]).unwrap();
        assert_eq!(filter_options(&bare), FilterOptions::default());
    }
}
