//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::{FilterOverrides, Settings};
use crate::dashboard::Session;
use crate::data::{DailyDataset, DatasetCache, HourlyDataset};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

/// Dataset loading result from background thread
enum LoadResult {
    Complete {
        daily: Arc<DailyDataset>,
        hourly: Arc<HourlyDataset>,
    },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    daily_path: PathBuf,
    hourly_path: PathBuf,
    initial_filters: FilterOverrides,
    cache: Arc<Mutex<DatasetCache>>,

    session: Option<Session>,
    load_error: Option<String>,

    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut app = Self {
            daily_path: settings.daily_path,
            hourly_path: settings.hourly_path,
            initial_filters: settings.filters,
            cache: Arc::new(Mutex::new(DatasetCache::new())),
            session: None,
            load_error: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load both datasets in a background thread through the shared cache.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status("Loading datasets...");

        let cache = Arc::clone(&self.cache);
        let daily_path = self.daily_path.clone();
        let hourly_path = self.hourly_path.clone();

        thread::spawn(move || {
            let _ = tx.send(Self::load_datasets(&cache, &daily_path, &hourly_path));
        });
    }

    /// Run loading (called from background thread)
    fn load_datasets(
        cache: &Mutex<DatasetCache>,
        daily_path: &Path,
        hourly_path: &Path,
    ) -> LoadResult {
        let Ok(mut cache) = cache.lock() else {
            return LoadResult::Error("dataset cache is poisoned".to_string());
        };
        let daily = match cache.daily(daily_path) {
            Ok(daily) => daily,
            Err(e) => return LoadResult::Error(e.to_string()),
        };
        match cache.hourly(hourly_path) {
            Ok(hourly) => LoadResult::Complete { daily, hourly },
            Err(e) => LoadResult::Error(e.to_string()),
        }
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { daily, hourly }) => {
                let (days, hours) = (daily.len(), hourly.len());
                let mut session = Session::new(daily, hourly);

                let mut params = session.params().clone();
                self.initial_filters.apply(&mut params);
                session.update(params);

                self.control_panel.sync(&session);
                self.control_panel
                    .set_status(&format!("Loaded {} days, {} hourly rows", days, hours));
                self.session = Some(session);
                self.load_error = None;
                self.is_loading = false;
            }
            Ok(LoadResult::Error(message)) => {
                error!("Loading failed: {}", message);
                self.control_panel.set_status(&format!("Error: {}", message));
                self.session = None;
                self.load_error = Some(message);
                self.is_loading = false;
            }
            Err(_) => {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Drop cached datasets unless a load currently holds the cache.
    fn try_clear_cache(cache: &Mutex<DatasetCache>) -> bool {
        match cache.try_lock() {
            Ok(mut cache) => {
                cache.clear();
                true
            }
            Err(_) => false,
        }
    }

    fn handle_reload(&mut self) {
        if self.is_loading || !Self::try_clear_cache(&self.cache) {
            self.control_panel.set_status("Loading in progress");
            return;
        }
        // Keep the user's current selection across the reload.
        if let Some(session) = &self.session {
            let params = session.params();
            self.initial_filters = FilterOverrides {
                start: Some(params.start),
                end: Some(params.end),
                seasons: Some(params.seasons.iter().copied().collect()),
                day_kind: Some(params.day_kind),
                min_hour: Some(params.min_hour),
                max_hour: Some(params.max_hour),
            };
        }
        self.start_loading();
    }

    fn handle_filters_changed(&mut self) {
        let (Some(session), Some(params)) = (self.session.as_mut(), &self.control_panel.params)
        else {
            return;
        };
        session.update(params.clone());
        self.control_panel.sync(session);
    }

    /// Export every chart of the current dashboard to a chosen folder.
    fn handle_export_png(&mut self) {
        let Some(session) = &self.session else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match StaticChartRenderer::export_dashboard(session.dashboard(), &dir) {
            Ok(files) => {
                info!("Exported {} charts", files.len());
                self.control_panel
                    .set_status(&format!("Exported {} charts to {}", files.len(), dir.display()));
            }
            Err(e) => {
                self.control_panel
                    .set_status(&format!("Error: export failed: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel
                        .show(ui, self.session.as_ref(), self.is_loading);

                    match action {
                        ControlPanelAction::FiltersChanged => self.handle_filters_changed(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("✖ Could not load data: {}", message))
                            .size(16.0)
                            .color(egui::Color32::from_rgb(220, 53, 69)),
                    );
                });
                return;
            }
            if self.is_loading && self.session.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            }
            self.chart_viewer
                .show(ui, self.session.as_ref().map(|s| s.dashboard()));
        });
    }
}
