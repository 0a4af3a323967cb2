//! Season Compare Main Application
//! Main window with control panel and dashboard viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DatasetBundle, DatasetLoader, FilterCriteria, UploadKey, UploadSet, UploadedFile};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardViewer};
use crate::state::{ReadTicket, Season, SessionState};
use anyhow::Context;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Loading results from background threads
enum LoadResult {
    /// Files read from disk, not parsed yet.
    FilesRead {
        season: Season,
        ticket: ReadTicket,
        upload: UploadSet,
    },
    Parsed {
        season: Season,
        key: UploadKey,
        result: Result<DatasetBundle, String>,
    },
    Error {
        season: Season,
        ticket: ReadTicket,
        message: String,
    },
}

/// Main application window.
pub struct SeasonCompareApp {
    config: DashboardConfig,
    loader: DatasetLoader,
    session: SessionState,
    control_panel: ControlPanel,
    dashboard: DashboardViewer,

    load_tx: Sender<LoadResult>,
    load_rx: Receiver<LoadResult>,
}

impl SeasonCompareApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let (load_tx, load_rx) = channel();
        Self {
            config,
            loader: DatasetLoader::new(),
            session: SessionState::new(),
            control_panel: ControlPanel::new(),
            dashboard: DashboardViewer::new(),
            load_tx,
            load_rx,
        }
    }

    /// Pick CSV files for a season and read them in the background.
    fn handle_browse(&mut self, season: Season) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_title(format!("Choose the {} championship files", season.label(&self.config)))
            .pick_files()
        else {
            return; // User cancelled
        };

        let ticket = self.session.begin_read(season);
        self.control_panel.set_status("Reading files...");
        let tx = self.load_tx.clone();

        thread::spawn(move || {
            let message = match Self::read_files(&paths) {
                Ok(upload) => LoadResult::FilesRead {
                    season,
                    ticket,
                    upload,
                },
                Err(e) => LoadResult::Error {
                    season,
                    ticket,
                    message: format!("{e:#}"),
                },
            };
            let _ = tx.send(message);
        });
    }

    fn read_files(paths: &[PathBuf]) -> anyhow::Result<UploadSet> {
        let files = paths
            .iter()
            .map(|path| {
                UploadedFile::read(path).with_context(|| format!("reading {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(UploadSet::new(files))
    }

    /// New upload set for a season: serve it from the cache or parse it.
    fn handle_files_read(&mut self, season: Season, upload: UploadSet) {
        let key = upload.key();
        log::info!(
            "Season {} upload: {}",
            season.label(&self.config),
            upload.file_names().join(", ")
        );
        self.session.begin_upload(season, upload.file_names(), key);

        if let Some(bundle) = self.loader.cached(key) {
            log::debug!("Season {} served from cache", season.label(&self.config));
            self.session.finish_upload(season, key, Ok(bundle));
            self.refresh();
            return;
        }

        self.control_panel.set_status("Parsing CSV files...");
        let tx = self.load_tx.clone();
        thread::spawn(move || {
            let result = DatasetLoader::parse(&upload).map_err(|e| e.to_string());
            let _ = tx.send(LoadResult::Parsed { season, key, result });
        });
    }

    /// Check for background loading results
    fn check_load_results(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            match result {
                LoadResult::FilesRead {
                    season,
                    ticket,
                    upload,
                } => {
                    if self.session.is_current_read(season, ticket) {
                        self.handle_files_read(season, upload);
                    } else {
                        log::debug!("Dropping superseded file read for season {:?}", season);
                    }
                }
                LoadResult::Parsed { season, key, result } => {
                    let result = result.map(|bundle| {
                        log::info!(
                            "Season {} datasets: {}",
                            season.label(&self.config),
                            bundle.names().join(", ")
                        );
                        let bundle = self.loader.store(key, bundle);
                        log::debug!("{} upload sets parsed this session", self.loader.parse_count());
                        bundle
                    });
                    if let Err(e) = &result {
                        log::error!("Failed to load season {}: {}", season.label(&self.config), e);
                    }
                    if self.session.finish_upload(season, key, result) {
                        self.refresh();
                    }
                }
                LoadResult::Error {
                    season,
                    ticket,
                    message,
                } => {
                    if !self.session.fail_read(season, ticket) {
                        continue;
                    }
                    log::error!("Failed to read season {} files: {}", season.label(&self.config), message);
                    self.control_panel.set_status(format!("Error: {}", message));
                }
            }
        }
    }

    fn handle_filters_changed(&mut self, criteria: FilterCriteria) {
        if self.session.set_criteria(criteria) {
            self.refresh();
        }
    }

    /// Re-run the pipeline and update the status line.
    fn refresh(&mut self) {
        self.session.recompute(&self.config);
        let status = match self.session.view() {
            Some(view) => match &view.players {
                Some(players) => format!(
                    "{} rows ({}) / {} rows ({})",
                    players.filtered_a.height(),
                    view.labels.a,
                    players.filtered_b.height(),
                    view.labels.b
                ),
                None => "Computed".to_string(),
            },
            None if self.session.is_loading() => "Parsing CSV files...".to_string(),
            None => "Waiting for both seasons".to_string(),
        };
        self.control_panel.set_status(status);
    }

    /// Export the charts as PNG files into a chosen folder, then open it.
    fn handle_export_charts(&mut self) {
        let Some(view) = self.session.view() else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new()
            .set_title("Choose an export folder")
            .pick_folder()
        else {
            return; // User cancelled
        };

        let size = (self.config.export_width, self.config.export_height);
        match StaticChartRenderer::export_dashboard(view, &dir, size) {
            Ok(paths) => {
                self.control_panel
                    .set_status(format!("Exported {} charts", paths.len()));
                if let Err(e) = open::that(&dir) {
                    log::warn!("Could not open {}: {}", dir.display(), e);
                }
            }
            Err(e) => {
                log::error!("Chart export failed: {e}");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for SeasonCompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.session.is_loading() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.session, &self.config);

                    match action {
                        ControlPanelAction::BrowseSeason(season) => self.handle_browse(season),
                        ControlPanelAction::FiltersChanged(criteria) => {
                            self.handle_filters_changed(criteria)
                        }
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            let pending = if self.session.view().is_none() {
                self.session.awaiting_notices(&self.config)
            } else {
                Vec::new()
            };
            self.dashboard.show(ui, self.session.view(), &pending);
        });
    }
}
