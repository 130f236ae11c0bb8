//! Chart Viewer Widget
//! Central scrollable panel showing the rendered dashboard.

use crate::charts::ChartPlotter;
use crate::dashboard::{Dashboard, Metrics, NoticeLevel, Panel, Section};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const CARD_SPACING: f32 = 12.0;

/// Scrollable view over one [`Dashboard`].
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, dashboard: Option<&Dashboard>) {
        let Some(dashboard) = dashboard else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(&dashboard.title).size(26.0).strong());
                ui.add_space(6.0);
                for paragraph in &dashboard.intro {
                    ui.label(paragraph);
                }

                if let Some(metrics) = &dashboard.metrics {
                    ui.add_space(10.0);
                    Self::draw_metrics(ui, metrics);
                }

                for (s, section) in dashboard.sections.iter().enumerate() {
                    ui.add_space(SECTION_SPACING);
                    Self::draw_section(ui, section, s);
                }

                if !dashboard.insights.is_empty() {
                    ui.add_space(SECTION_SPACING);
                    ui.separator();
                    ui.label(RichText::new("Key Insights").size(18.0).strong());
                    for insight in &dashboard.insights {
                        ui.label(format!("• {}", insight));
                    }
                }
            });
    }

    fn draw_metrics(ui: &mut egui::Ui, metrics: &Metrics) {
        ui.horizontal(|ui| {
            for (label, value) in [
                ("Days", metrics.days.to_string()),
                ("Total rentals", metrics.total_rentals.to_string()),
                (
                    "Average per day",
                    format!("{:.1}", metrics.average_daily_rentals),
                ),
            ] {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(6.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(20.0).strong());
                        });
                    });
                ui.add_space(CARD_SPACING);
            }
        });
    }

    fn draw_section(ui: &mut egui::Ui, section: &Section, index: usize) {
        ui.label(RichText::new(&section.title).size(20.0).strong());
        ui.separator();

        for (p, panel) in section.panels.iter().enumerate() {
            ui.add_space(CARD_SPACING);
            match panel {
                Panel::Chart(chart) => {
                    egui::Frame::none()
                        .rounding(8.0)
                        .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
                        .fill(ui.visuals().widgets.noninteractive.bg_fill)
                        .inner_margin(12.0)
                        .show(ui, |ui| {
                            ChartPlotter::draw(ui, chart, &format!("{index}_{p}"));
                        });
                }
                Panel::Notice(notice) => {
                    let (icon, color) = match notice.level {
                        NoticeLevel::Info => ("ℹ", Color32::from_rgb(52, 152, 219)),
                        NoticeLevel::Warning => ("⚠", Color32::from_rgb(243, 156, 18)),
                        NoticeLevel::Error => ("✖", Color32::from_rgb(220, 53, 69)),
                    };
                    egui::Frame::none()
                        .rounding(6.0)
                        .stroke(egui::Stroke::new(1.5, color))
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(format!("{} {}", icon, notice.message)).color(color),
                            );
                        });
                }
            }
        }
    }
}
