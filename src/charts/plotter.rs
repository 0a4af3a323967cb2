//! Chart Plotter Module
//! Interactive season charts using egui_plot.

use crate::pipeline::WinrateDistributions;
use crate::stats::{ComparisonTable, Distribution};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

/// Season colors: blue for the first season, red for the second.
pub const SEASON_A_COLOR: Color32 = Color32::from_rgb(52, 152, 219);
pub const SEASON_B_COLOR: Color32 = Color32::from_rgb(231, 76, 60);

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Fraction of a category slot covered by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

/// Position of one bar inside a grouped bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSlot {
    pub center: f64,
    pub width: f64,
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(series_index: usize) -> Color32 {
        PALETTE[series_index % PALETTE.len()]
    }

    /// Where bar `series` of `n_series` sits over category `category`.
    pub fn bar_slot(category: usize, series: usize, n_series: usize) -> BarSlot {
        let n_series = n_series.max(1);
        let width = GROUP_WIDTH / n_series as f64;
        let left = category as f64 - GROUP_WIDTH / 2.0;
        BarSlot {
            center: left + width * (series as f64 + 0.5),
            width,
        }
    }

    /// Maps integer plot coordinates back to category labels.
    fn category_formatter(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// Two win-rate histograms side by side, one per season.
    pub fn draw_winrate_histograms(
        ui: &mut egui::Ui,
        distributions: &WinrateDistributions,
        labels: (&str, &str),
    ) {
        let width = (ui.available_width() - 10.0) / 2.0;
        ui.horizontal(|ui| {
            for (dist, label, color) in [
                (&distributions.a, labels.0, SEASON_A_COLOR),
                (&distributions.b, labels.1, SEASON_B_COLOR),
            ] {
                ui.vertical(|ui| {
                    ui.set_width(width);
                    ui.label(egui::RichText::new(format!("Winrate distribution - {}", label)).strong());
                    if dist.is_empty() {
                        ui.label(egui::RichText::new("No winrate values.").color(egui::Color32::GRAY));
                    } else {
                        Self::draw_histogram(ui, dist, label, color);
                    }
                });
            }
        });
    }

    fn draw_histogram(ui: &mut egui::Ui, dist: &Distribution, label: &str, color: Color32) {
        Plot::new(format!("winrate_hist_{}", label))
            .height(260.0)
            .allow_scroll(false)
            .x_axis_label("Winrate")
            .y_axis_label("Frequency")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = dist
                    .bins
                    .iter()
                    .map(|bin| {
                        Bar::new(bin.center(), bin.count as f64)
                            .width(bin.width())
                            .fill(color.gamma_multiply(0.5))
                            .stroke(egui::Stroke::new(1.0, color))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(label));

                if !dist.kde.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(dist.kde.iter().copied()))
                            .color(color)
                            .width(2.0)
                            .name("KDE"),
                    );
                }
            });
    }

    /// Grouped bars: one group per table row, one bar per column.
    pub fn draw_comparison_chart(ui: &mut egui::Ui, id: &str, table: &ComparisonTable, y_label: &str) {
        let x_labels = table.index.clone();
        let n_series = table.columns.len();

        Plot::new(format!("comparison_{}", id))
            .height(340.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label(table.index_name.clone())
            .y_axis_label(y_label.to_string())
            .include_y(0.0)
            .x_axis_formatter(Self::category_formatter(x_labels))
            .show(ui, |plot_ui| {
                for (series, column) in table.columns.iter().enumerate() {
                    let color = Self::series_color(series);
                    let bars: Vec<Bar> = table
                        .values
                        .iter()
                        .enumerate()
                        .map(|(row, values)| {
                            let slot = Self::bar_slot(row, series, n_series);
                            Bar::new(slot.center, values[series])
                                .width(slot.width)
                                .name(format!("{} {}", table.index[row], column))
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(column));
                }
            });
    }

    /// Render a comparison table as a striped grid under its chart.
    pub fn draw_comparison_table(ui: &mut egui::Ui, id: &str, table: &ComparisonTable) {
        egui::ScrollArea::horizontal()
            .id_salt(format!("comparison_table_scroll_{}", id))
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("comparison_table_{}", id)))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&table.index_name).strong().size(11.0));
                        for column in &table.columns {
                            ui.label(egui::RichText::new(column).strong().size(11.0));
                        }
                        ui.end_row();

                        for (key, row) in table.index.iter().zip(&table.values) {
                            ui.label(egui::RichText::new(key).size(11.0));
                            for v in row {
                                ui.label(egui::RichText::new(format!("{:.3}", v)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_slots_stay_inside_their_group() {
        let n = 8;
        let first = ChartPlotter::bar_slot(2, 0, n);
        let last = ChartPlotter::bar_slot(2, n - 1, n);

        assert!((first.width - 0.1).abs() < 1e-12);
        assert!((first.center - first.width / 2.0 - 1.6).abs() < 1e-12);
        assert!((last.center + last.width / 2.0 - 2.4).abs() < 1e-12);
    }

    #[test]
    fn single_series_is_centered() {
        let slot = ChartPlotter::bar_slot(3, 0, 1);
        assert!((slot.center - 3.0).abs() < 1e-12);
        assert!((slot.width - GROUP_WIDTH).abs() < 1e-12);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(PALETTE.len()));
    }
}
