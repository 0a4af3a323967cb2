//! Control Panel Widget
//! Left side panel: season uploads, team / position filters, export.

use crate::config::DashboardConfig;
use crate::data::{Criterion, FilterCriteria};
use crate::state::{Season, SessionState};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel.
pub struct ControlPanel {
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &SessionState,
        config: &DashboardConfig,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏆 Season Compare")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(format!("League of Legends {} vs {}", config.season_a, config.season_b))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📂 Championship Files").size(14.0).strong());
        ui.add_space(5.0);

        for season in Season::BOTH {
            if self.show_season_upload(ui, session, config, season) {
                action = ControlPanelAction::BrowseSeason(season);
            }
            ui.add_space(6.0);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("🎚️ Filters").size(14.0).strong());
        ui.label(
            RichText::new("Refine the analysis with the filters below.")
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(8.0);

        let options = session
            .view()
            .map(|view| view.filter_options.clone())
            .unwrap_or_default();
        let mut criteria = session.criteria().clone();

        ui.add_enabled_ui(session.pipeline().is_computed(), |ui| {
            Self::criterion_combo(ui, "team_filter", "Team:", &mut criteria.team, &options.teams);
            ui.add_space(5.0);
            Self::criterion_combo(
                ui,
                "position_filter",
                "Position:",
                &mut criteria.position,
                &options.positions,
            );
        });

        if &criteria != session.criteria() {
            action = ControlPanelAction::FiltersChanged(criteria);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(session.pipeline().is_computed(), |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        if session.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading files...").size(11.0));
            });
        }

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// One season's upload box. Returns true when Browse was clicked.
    fn show_season_upload(
        &self,
        ui: &mut egui::Ui,
        session: &SessionState,
        config: &DashboardConfig,
        season: Season,
    ) -> bool {
        let slot = session.slot(season);
        let mut clicked = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(season.label(config)).size(13.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            clicked = true;
                        }
                    });
                });

                if slot.file_names.is_empty() {
                    ui.label(RichText::new("No files selected").size(12.0).color(Color32::GRAY));
                }
                for name in &slot.file_names {
                    ui.label(RichText::new(name).size(12.0));
                }

                if let Some(e) = &slot.load_error {
                    ui.label(
                        RichText::new(format!("⚠ {}", e))
                            .size(11.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                } else if let Some(bundle) = &slot.bundle {
                    ui.label(
                        RichText::new(format!("✓ {} datasets", bundle.len()))
                            .size(11.0)
                            .color(Color32::from_rgb(40, 167, 69)),
                    );
                }
            });

        clicked
    }

    fn criterion_combo(
        ui: &mut egui::Ui,
        id: &str,
        label: &str,
        selected: &mut Criterion,
        choices: &[Criterion],
    ) {
        let label_width = 70.0;
        let combo_width = 180.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new(label));
            ComboBox::from_id_salt(id)
                .width(combo_width)
                .selected_text(selected.to_string())
                .show_ui(ui, |ui| {
                    for choice in choices {
                        if ui
                            .selectable_label(selected == choice, choice.to_string())
                            .clicked()
                        {
                            *selected = choice.clone();
                        }
                    }
                });
        });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseSeason(Season),
    FiltersChanged(FilterCriteria),
    ExportCharts,
}
