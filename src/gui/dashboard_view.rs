//! Dashboard Viewer Widget
//! Central scrollable panel: notices, data previews, descriptive statistics
//! and the season comparison charts.

use crate::charts::ChartPlotter;
use crate::data::table::format_float;
use crate::pipeline::{DashboardView, Notice, NoticeLevel};
use crate::stats::{DescribeTable, TablePreview, DESCRIBE_ROWS};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const TITLE_COLOR: Color32 = Color32::from_rgb(44, 62, 80);

/// Renders a computed dashboard, or the notices while awaiting uploads.
#[derive(Default)]
pub struct DashboardViewer;

impl DashboardViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, ui: &mut egui::Ui, view: Option<&DashboardView>, pending: &[Notice]) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::header(ui, view);

                let Some(view) = view else {
                    for notice in pending {
                        Self::notice(ui, notice);
                    }
                    return;
                };

                for notice in &view.notices {
                    Self::notice(ui, notice);
                }

                Self::previews(ui, view);

                if let Some(players) = &view.players {
                    Self::separator(ui);
                    Self::subtitle(
                        ui,
                        &format!("📊 Player statistics ({} vs {})", view.labels.a, view.labels.b),
                    );
                    ui.label("Descriptive statistics of the filtered player data.");
                    ui.add_space(6.0);

                    let half = (ui.available_width() - 10.0) / 2.0;
                    ui.horizontal_top(|ui| {
                        for (label, table) in [
                            (&view.labels.a, &players.describe_a),
                            (&view.labels.b, &players.describe_b),
                        ] {
                            ui.vertical(|ui| {
                                ui.set_width(half);
                                ui.label(RichText::new(format!("{} data:", label)).strong());
                                Self::describe_grid(ui, &format!("describe_{}", label), table);
                            });
                        }
                    });

                    if let Some(winrate) = &players.winrate {
                        ui.add_space(SECTION_SPACING);
                        Self::subtitle(ui, "📈 Player winrate distribution");
                        ChartPlotter::draw_winrate_histograms(
                            ui,
                            winrate,
                            (view.labels.a.as_str(), view.labels.b.as_str()),
                        );
                    }

                    if let Some(positions) = &players.positions {
                        Self::separator(ui);
                        Self::subtitle(
                            ui,
                            &format!(
                                "📊 Average attributes per position ({} vs {})",
                                view.labels.a, view.labels.b
                            ),
                        );
                        ui.label("Mean kills, deaths, assists and gold per minute for each position.");
                        ChartPlotter::draw_comparison_chart(ui, "positions", positions, "Mean");
                        ChartPlotter::draw_comparison_table(ui, "positions", positions);
                    }
                }

                if let Some(teams) = &view.team_metrics {
                    Self::separator(ui);
                    Self::subtitle(
                        ui,
                        &format!("🏅 Average team metrics ({} vs {})", view.labels.a, view.labels.b),
                    );
                    if teams.table.is_empty() {
                        ui.label(
                            RichText::new("No numeric team metrics found.").color(Color32::GRAY),
                        );
                    } else {
                        ChartPlotter::draw_comparison_chart(ui, "teams", &teams.table, "Mean");
                        ChartPlotter::draw_comparison_table(ui, "teams", &teams.table);
                    }
                }
            });
    }

    fn header(ui: &mut egui::Ui, view: Option<&DashboardView>) {
        let title = match view {
            Some(view) => format!(
                "🏆 League of Legends Championship: {} vs {}",
                view.labels.a, view.labels.b
            ),
            None => "🏆 League of Legends Championship comparison".to_string(),
        };
        ui.add_space(8.0);
        ui.label(RichText::new(title).size(26.0).strong().color(TITLE_COLOR));
        ui.label(
            "Compare player and team performance between two championship seasons. \
             Use the filters on the left to refine the data.",
        );
        ui.add_space(10.0);
    }

    fn previews(ui: &mut egui::Ui, view: &DashboardView) {
        for (label, preview) in [
            (&view.labels.a, &view.preview_a),
            (&view.labels.b, &view.preview_b),
        ] {
            if let Some(preview) = preview {
                ui.add_space(6.0);
                ui.label(format!(
                    "{} data loaded ({} rows):",
                    label, preview.total_rows
                ));
                Self::preview_grid(ui, &format!("preview_{}", label), preview);
            }
        }
    }

    fn notice(ui: &mut egui::Ui, notice: &Notice) {
        let (icon, color) = match notice.level {
            NoticeLevel::Info => ("ℹ", Color32::from_rgb(100, 149, 237)),
            NoticeLevel::Warning => ("⚠", Color32::from_rgb(243, 156, 18)),
            NoticeLevel::Error => ("⚠", Color32::from_rgb(220, 53, 69)),
        };

        egui::Frame::none()
            .fill(color.gamma_multiply(0.15))
            .rounding(6.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(format!("{} {}", icon, notice.message)).color(color));
            });
        ui.add_space(4.0);
    }

    fn subtitle(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(19.0).strong().color(TITLE_COLOR));
        ui.add_space(4.0);
    }

    fn separator(ui: &mut egui::Ui) {
        ui.add_space(SECTION_SPACING);
        ui.separator();
        ui.add_space(SECTION_SPACING / 2.0);
    }

    fn preview_grid(ui: &mut egui::Ui, id: &str, preview: &TablePreview) {
        ScrollArea::horizontal().id_salt(format!("{}_scroll", id)).show(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(id))
                .striped(true)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    ui.label("");
                    for column in &preview.columns {
                        ui.label(RichText::new(column).strong().size(11.0));
                    }
                    ui.end_row();

                    for (i, row) in preview.rows.iter().enumerate() {
                        ui.label(RichText::new(i.to_string()).color(Color32::GRAY).size(11.0));
                        for cell in row {
                            ui.label(RichText::new(cell).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn describe_grid(ui: &mut egui::Ui, id: &str, table: &DescribeTable) {
        if table.is_empty() {
            ui.label(RichText::new("No numeric columns.").color(Color32::GRAY));
            return;
        }

        ScrollArea::horizontal().id_salt(format!("{}_scroll", id)).show(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(id))
                .striped(true)
                .spacing([10.0, 4.0])
                .show(ui, |ui| {
                    ui.label("");
                    for summary in &table.summaries {
                        ui.label(RichText::new(&summary.column).strong().size(11.0));
                    }
                    ui.end_row();

                    for (row, name) in DESCRIBE_ROWS.iter().enumerate() {
                        ui.label(RichText::new(*name).strong().size(11.0));
                        for summary in &table.summaries {
                            let value = summary.row_values()[row];
                            ui.label(RichText::new(format_float(value)).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
    }
}
