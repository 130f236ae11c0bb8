//! Control Panel Widget
//! Left side panel with the filter controls.

use crate::dashboard::{FilterParams, Session};
use crate::data::{DayKind, HourRange, Season};
use egui::{Color32, RichText};
use egui_extras::DatePickerButton;

/// Sidebar holding an editable copy of the session's filter parameters.
pub struct ControlPanel {
    pub params: Option<FilterParams>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            params: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the session's (possibly clamped) parameters as the new edit state.
    pub fn sync(&mut self, session: &Session) {
        self.params = Some(session.params().clone());
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: Option<&Session>,
        is_loading: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Bike Rentals")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Filters").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();

        match (session, self.params.as_mut()) {
            (Some(session), Some(params)) => {
                if Self::show_filters(ui, session, params) {
                    action = ControlPanelAction::FiltersChanged;
                }
                if let Some(warning) = session.warning() {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new(format!("⚠ {}", warning))
                            .size(12.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }
            }
            _ => {
                ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!is_loading, |ui| {
                let reload = egui::Button::new(RichText::new("⟳ Reload Data").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(reload).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(session.is_some(), |ui| {
                let export = egui::Button::new(RichText::new("📄 Export PNGs").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Returns whether any filter was edited this frame.
    fn show_filters(ui: &mut egui::Ui, session: &Session, params: &mut FilterParams) -> bool {
        let mut changed = false;

        // ===== Date Range =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        if let Some((first, last)) = session.date_bounds() {
            ui.label(
                RichText::new(format!("Data covers {} to {}", first, last))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
        ui.add_space(5.0);
        egui::Grid::new("date_range").num_columns(2).show(ui, |ui| {
            ui.label("Start:");
            changed |= ui
                .add(DatePickerButton::new(&mut params.start).id_salt("start_date"))
                .changed();
            ui.end_row();
            ui.label("End:");
            changed |= ui
                .add(DatePickerButton::new(&mut params.end).id_salt("end_date"))
                .changed();
            ui.end_row();
        });

        ui.add_space(10.0);
        ui.separator();

        // ===== Seasons =====
        ui.label(RichText::new("🌤 Seasons").size(14.0).strong());
        ui.add_space(5.0);
        for season in Season::ALL {
            let mut selected = params.seasons.contains(&season);
            if ui.checkbox(&mut selected, season.name()).changed() {
                if selected {
                    params.seasons.insert(season);
                } else {
                    params.seasons.remove(&season);
                }
                changed = true;
            }
        }

        ui.add_space(10.0);
        ui.separator();

        // ===== Hourly Filters =====
        ui.label(RichText::new("🕒 Hourly Pattern").size(14.0).strong());
        ui.add_space(5.0);
        for kind in [DayKind::All, DayKind::WorkingDay, DayKind::NonWorkingDay] {
            changed |= ui
                .radio_value(&mut params.day_kind, kind, kind.label())
                .changed();
        }

        let bounds = session.hour_bounds().unwrap_or(HourRange::FULL);
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label("Hours:");
            changed |= ui
                .add(egui::DragValue::new(&mut params.min_hour).range(bounds.min()..=bounds.max()))
                .changed();
            ui.label("to");
            changed |= ui
                .add(egui::DragValue::new(&mut params.max_hour).range(bounds.min()..=bounds.max()))
                .changed();
        });

        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FiltersChanged,
    Reload,
    ExportPng,
}
