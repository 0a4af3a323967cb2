//! Static Chart Renderer
//! Writes the dashboard charts as PNG files with plotters.
//!
//! Files written by `export_dashboard`:
//! 1. `winrate_distribution.png`: both seasons' histograms side by side
//! 2. `position_attributes.png`: grouped bars of per-position means
//! 3. `team_metrics.png`: bars of team metric means

use crate::pipeline::{DashboardView, WinrateDistributions};
use crate::stats::{ComparisonTable, Distribution};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw {chart}: {message}")]
    Draw { chart: String, message: String },
    #[error("Nothing to export")]
    NothingToExport,
}

// Colors (RGB), same hues as the interactive charts
const SEASON_A: RGBColor = RGBColor(52, 152, 219);
const SEASON_B: RGBColor = RGBColor(231, 76, 60);
const SERIES: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Export every chart present in the view. Returns the written paths.
    pub fn export_dashboard(
        view: &DashboardView,
        dir: &Path,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, RenderError> {
        let mut written = Vec::new();

        if let Some(players) = &view.players {
            if let Some(winrate) = &players.winrate {
                let path = dir.join("winrate_distribution.png");
                Self::render_winrate(winrate, (view.labels.a.as_str(), view.labels.b.as_str()), &path, size)?;
                written.push(path);
            }
            if let Some(positions) = &players.positions {
                let path = dir.join("position_attributes.png");
                Self::render_comparison(
                    positions,
                    &format!("Average attributes per position ({} vs {})", view.labels.a, view.labels.b),
                    "Mean",
                    &path,
                    size,
                )?;
                written.push(path);
            }
        }

        if let Some(teams) = &view.team_metrics {
            if !teams.table.is_empty() {
                let path = dir.join("team_metrics.png");
                Self::render_comparison(
                    &teams.table,
                    &format!("Average team metrics ({} vs {})", view.labels.a, view.labels.b),
                    "Mean",
                    &path,
                    size,
                )?;
                written.push(path);
            }
        }

        if written.is_empty() {
            return Err(RenderError::NothingToExport);
        }
        log::info!("Exported {} charts to {}", written.len(), dir.display());
        Ok(written)
    }

    /// Two histograms with their density curves, left and right.
    pub fn render_winrate(
        dists: &WinrateDistributions,
        labels: (&str, &str),
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let chart = "winrate distribution";
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| Self::draw_err(chart, e))?;

        let (left, right) = root.split_horizontally((size.0 / 2) as i32);
        Self::draw_histogram(&left, &dists.a, labels.0, SEASON_A).map_err(|e| Self::draw_err(chart, e))?;
        Self::draw_histogram(&right, &dists.b, labels.1, SEASON_B).map_err(|e| Self::draw_err(chart, e))?;

        root.present().map_err(|e| Self::draw_err(chart, e))?;
        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        dist: &Distribution,
        label: &str,
        color: RGBColor,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (x_min, x_max) = Self::x_range(dist);
        let kde_peak = dist.kde.iter().fold(0.0_f64, |acc, p| acc.max(p[1]));
        let y_max = Self::padded_max((dist.max_count() as f64).max(kde_peak));

        let mut chart = ChartBuilder::on(area)
            .caption(format!("Winrate distribution - {}", label), ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Winrate")
            .y_desc("Frequency")
            .draw()?;

        chart.draw_series(dist.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], color.mix(0.5).filled())
        }))?;
        chart.draw_series(dist.bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], color.stroke_width(1))
        }))?;

        if !dist.kde.is_empty() {
            chart.draw_series(LineSeries::new(
                dist.kde.iter().map(|p| (p[0], p[1])),
                color.stroke_width(2),
            ))?;
        }
        Ok(())
    }

    /// Grouped bar chart of a comparison table with a legend per column.
    pub fn render_comparison(
        table: &ComparisonTable,
        title: &str,
        y_desc: &str,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| Self::draw_err(title, e))?;
        Self::draw_comparison(&root, table, title, y_desc).map_err(|e| Self::draw_err(title, e))?;
        root.present().map_err(|e| Self::draw_err(title, e))?;
        Ok(())
    }

    fn draw_comparison<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        table: &ComparisonTable,
        title: &str,
        y_desc: &str,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let n_rows = table.index.len().max(1);
        let n_series = table.columns.len();
        let (y_min, y_max) = Self::value_range(table);

        let mut chart = ChartBuilder::on(area)
            .caption(title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n_rows as f64 - 0.5), y_min..y_max)?;

        let labels = table.index.clone();
        let label_for = move |x: &f64| {
            let rounded = x.round();
            if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n_rows * 2 + 1)
            .x_label_formatter(&label_for)
            .x_desc(table.index_name.as_str())
            .y_desc(y_desc)
            .draw()?;

        for (series, column) in table.columns.iter().enumerate() {
            let color = SERIES[series % SERIES.len()];
            chart
                .draw_series(table.values.iter().enumerate().map(|(row, values)| {
                    let slot = crate::charts::ChartPlotter::bar_slot(row, series, n_series);
                    let half = slot.width / 2.0;
                    Rectangle::new(
                        [(slot.center - half, 0.0), (slot.center + half, values[series])],
                        color.filled(),
                    )
                }))?
                .label(column.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_err(chart: &str, e: impl std::fmt::Display) -> RenderError {
        RenderError::Draw {
            chart: chart.to_string(),
            message: e.to_string(),
        }
    }

    /// Add 10% headroom; an all-zero axis still gets a unit range.
    fn padded_max(max: f64) -> f64 {
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn x_range(dist: &Distribution) -> (f64, f64) {
        let mut lo = dist.bins.first().map(|b| b.start).unwrap_or(0.0);
        let mut hi = dist.bins.last().map(|b| b.end).unwrap_or(1.0);
        if let (Some(first), Some(last)) = (dist.kde.first(), dist.kde.last()) {
            lo = lo.min(first[0]);
            hi = hi.max(last[0]);
        }
        if hi - lo <= f64::EPSILON {
            (lo - 0.5, hi + 0.5)
        } else {
            (lo, hi)
        }
    }

    /// Y range including zero and every cell.
    fn value_range(table: &ComparisonTable) -> (f64, f64) {
        let (lo, hi) = table
            .values
            .iter()
            .flatten()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let lo = if lo < 0.0 { lo * 1.1 } else { 0.0 };
        (lo, Self::padded_max(hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::histogram::HistogramBin;

    #[test]
    fn value_range_includes_zero_and_headroom() {
        let table = ComparisonTable {
            index_name: "position".into(),
            index: vec!["top".into()],
            columns: vec!["kills_2020".into(), "kills_2022".into()],
            values: vec![vec![4.0, 10.0]],
        };
        let (lo, hi) = StaticChartRenderer::value_range(&table);
        assert_eq!(lo, 0.0);
        assert!((hi - 11.0).abs() < 1e-9);

        let zeros = ComparisonTable {
            values: vec![vec![0.0, 0.0]],
            ..table
        };
        assert_eq!(StaticChartRenderer::value_range(&zeros), (0.0, 1.0));
    }

    #[test]
    fn x_range_spans_bins() {
        let dist = Distribution {
            bins: vec![
                HistogramBin { start: 0.2, end: 0.4, count: 1 },
                HistogramBin { start: 0.4, end: 0.6, count: 3 },
            ],
            kde: Vec::new(),
            sample_size: 4,
        };
        assert_eq!(StaticChartRenderer::x_range(&dist), (0.2, 0.6));
    }

    #[test]
    fn empty_view_has_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticChartRenderer::export_dashboard(&DashboardView::default(), dir.path(), (800, 600))
            .unwrap_err();
        assert!(matches!(err, RenderError::NothingToExport));
    }
}
