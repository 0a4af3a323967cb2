//! Dashboard pipeline
//! load → filter → aggregate, as one pure function over two dataset bundles.
//! The GUI calls `run` after every interaction and only renders its output.

use crate::config::{DashboardConfig, SeasonLabels};
use crate::data::table::{has_column, present_values};
use crate::data::filter::FilterError;
use crate::data::{apply_filters, filter_options, DatasetBundle, FilterCriteria, FilterOptions};
use crate::stats::{
    compare_positions, compare_team_metrics, ComparisonTable, DescribeTable, Distribution,
    StatsCalculator, TablePreview, TeamMetricComparison,
};
use polars::prelude::{DataFrame, PolarsError};
use thiserror::Error;

pub const WINRATE_COLUMN: &str = "winrate";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] PolarsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown inline in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Win-rate histograms of both seasons.
#[derive(Debug, Clone, PartialEq)]
pub struct WinrateDistributions {
    pub a: Distribution,
    pub b: Distribution,
}

/// Everything derived from the two filtered player tables.
#[derive(Debug, Clone)]
pub struct PlayerComparison {
    pub filtered_a: DataFrame,
    pub filtered_b: DataFrame,
    pub describe_a: DescribeTable,
    pub describe_b: DescribeTable,
    /// Present only when both filtered tables carry a win-rate column.
    pub winrate: Option<WinrateDistributions>,
    /// Present only when a position column exists.
    pub positions: Option<ComparisonTable>,
}

/// The computed dashboard, ready for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub labels: SeasonLabels,
    pub notices: Vec<Notice>,
    /// Unfiltered player table head per season, when that dataset exists.
    pub preview_a: Option<TablePreview>,
    pub preview_b: Option<TablePreview>,
    pub filter_options: FilterOptions,
    pub players: Option<PlayerComparison>,
    pub team_metrics: Option<TeamMetricComparison>,
}

/// Pipeline lifecycle: waiting for both seasons, or computed.
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    #[default]
    AwaitingUploads,
    Computed(Box<DashboardView>),
}

impl PipelineState {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            PipelineState::AwaitingUploads => None,
            PipelineState::Computed(view) => Some(view),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, PipelineState::Computed(_))
    }
}

/// Run the whole computation for the current criteria.
pub fn run(
    season_a: &DatasetBundle,
    season_b: &DatasetBundle,
    criteria: &FilterCriteria,
    config: &DashboardConfig,
) -> DashboardView {
    let labels = config.season_labels();
    let mut view = DashboardView {
        labels: labels.clone(),
        ..Default::default()
    };

    let players_a = season_a.get(&config.players_dataset);
    let players_b = season_b.get(&config.players_dataset);

    view.preview_a = players_a.map(|df| TablePreview::head(df, config.preview_rows));
    view.preview_b = players_b.map(|df| TablePreview::head(df, config.preview_rows));

    for (label, present) in [(&labels.a, players_a.is_some()), (&labels.b, players_b.is_some())] {
        if !present {
            view.notices.push(Notice::error(format!(
                "Could not load the {} data: dataset '{}' not found",
                label, config.players_dataset
            )));
        }
    }

    if let (Some(a), Some(b)) = (players_a, players_b) {
        view.filter_options = filter_options(a);
        match compare_players(a, b, criteria, &labels) {
            Ok(players) => {
                if !criteria.is_unrestricted() {
                    for (label, filtered) in [(&labels.a, &players.filtered_a), (&labels.b, &players.filtered_b)] {
                        if filtered.height() == 0 {
                            view.notices.push(Notice::info(format!(
                                "No {} players match team={} position={}",
                                label, criteria.team, criteria.position
                            )));
                        }
                    }
                }
                view.players = Some(players);
            }
            Err(e) => {
                log::error!("Player comparison failed: {e}");
                view.notices.push(Notice::error(e.to_string()));
            }
        }
    }

    let teams_a = season_a.get(&config.teams_dataset);
    let teams_b = season_b.get(&config.teams_dataset);
    match (teams_a, teams_b) {
        (Some(a), Some(b)) => match compare_team_metrics(a, b, &labels) {
            Ok(comparison) => {
                if !comparison.missing_in_b.is_empty() {
                    view.notices.push(Notice::warning(format!(
                        "Team metrics missing in {} (shown as 0): {}",
                        labels.b,
                        comparison.missing_in_b.join(", ")
                    )));
                }
                view.team_metrics = Some(comparison);
            }
            Err(e) => {
                log::error!("Team comparison failed: {e}");
                view.notices.push(Notice::error(format!("Team comparison failed: {e}")));
            }
        },
        _ => {
            for (label, table) in [(&labels.a, teams_a), (&labels.b, teams_b)] {
                if table.is_none() {
                    view.notices.push(Notice::warning(format!(
                        "Team comparison skipped: dataset '{}' not found for {}",
                        config.teams_dataset, label
                    )));
                }
            }
        }
    }

    view
}

/// Filter both player tables with the same criteria and derive every
/// player-level section.
pub fn compare_players(
    a: &DataFrame,
    b: &DataFrame,
    criteria: &FilterCriteria,
    labels: &SeasonLabels,
) -> Result<PlayerComparison, PipelineError> {
    let filtered_a = apply_filters(a, criteria)?;
    let filtered_b = apply_filters(b, criteria)?;
    log::debug!(
        "Filtered players with team={} position={}: {} / {} rows",
        criteria.team,
        criteria.position,
        filtered_a.height(),
        filtered_b.height()
    );

    let (describe_a, describe_b) = rayon::join(
        || StatsCalculator::describe(&filtered_a),
        || StatsCalculator::describe(&filtered_b),
    );

    let winrate = (has_column(&filtered_a, WINRATE_COLUMN) && has_column(&filtered_b, WINRATE_COLUMN))
        .then(|| WinrateDistributions {
            a: Distribution::from_values(&present_values(&filtered_a, WINRATE_COLUMN)),
            b: Distribution::from_values(&present_values(&filtered_b, WINRATE_COLUMN)),
        });

    let positions = compare_positions(&filtered_a, &filtered_b, labels)?;

    Ok(PlayerComparison {
        filtered_a,
        filtered_b,
        describe_a,
        describe_b,
        winrate,
        positions,
    })
}
