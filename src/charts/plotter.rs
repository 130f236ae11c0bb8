//! Chart Plotter Module
//! Draws chart requests interactively using egui_plot.

use super::palette::{self, Rgb};
use super::request::{
    BarChart, BoxChart, ChartRequest, Heatmap, LineChart, StatsTable,
};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart as PlotBarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints,
    Points,
};

const PLOT_HEIGHT: f32 = 300.0;
const HEAT_CELL: egui::Vec2 = egui::vec2(110.0, 32.0);

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Draws chart requests with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any chart request; `id` must be unique per frame.
    pub fn draw(ui: &mut egui::Ui, chart: &ChartRequest, id: &str) {
        ui.label(RichText::new(chart.title()).size(15.0).strong());
        ui.add_space(4.0);
        match chart {
            ChartRequest::Bar(c) => Self::draw_bar_chart(ui, c, id),
            ChartRequest::Box(c) => Self::draw_box_chart(ui, c, id),
            ChartRequest::Heatmap(c) => Self::draw_heatmap(ui, c, id),
            ChartRequest::Lines(c) => Self::draw_line_chart(ui, c, id),
            ChartRequest::Table(t) => Self::draw_stats_table(ui, t, id),
        }
    }

    /// Category labels under integer x positions.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let idx = mark.value.round();
            if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        }
    }

    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &BarChart, id: &str) {
        let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();

        Plot::new(format!("bar_{id}"))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(chart.axes.x_label.clone())
            .y_axis_label(chart.axes.y_label.clone())
            .x_axis_formatter(Self::category_formatter(labels))
            .include_y(0.0)
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = chart
                    .bars
                    .iter()
                    .enumerate()
                    .filter_map(|(i, bar)| {
                        let value = bar.value?;
                        Some(
                            Bar::new(i as f64, value)
                                .width(0.6)
                                .name(format!("{}: {:.1}", bar.label, value))
                                .fill(color(palette::category_color(i))),
                        )
                    })
                    .collect();
                plot_ui.bar_chart(PlotBarChart::new(bars));
            });

        let missing: Vec<&str> = chart
            .bars
            .iter()
            .filter(|b| b.value.is_none())
            .map(|b| b.label.as_str())
            .collect();
        if !missing.is_empty() {
            ui.label(
                RichText::new(format!("No data: {}", missing.join(", ")))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
    }

    pub fn draw_box_chart(ui: &mut egui::Ui, chart: &BoxChart, id: &str) {
        let labels: Vec<String> = chart.boxes.iter().map(|b| b.label.clone()).collect();

        Plot::new(format!("box_{id}"))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(chart.axes.x_label.clone())
            .y_axis_label(chart.axes.y_label.clone())
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, series) in chart.boxes.iter().enumerate() {
                    let c = color(palette::category_color(i));
                    let s = &series.summary;

                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(s.whisker_low, s.q1, s.median, s.q3, s.whisker_high),
                    )
                    .box_width(0.5)
                    .fill(c.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, c));
                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&series.label));

                    // Outliers beyond the whiskers
                    let outliers: PlotPoints = series
                        .values
                        .iter()
                        .filter(|&&v| v < s.whisker_low || v > s.whisker_high)
                        .map(|&v| [i as f64, v])
                        .collect();
                    plot_ui.points(
                        Points::new(outliers)
                            .radius(3.0)
                            .color(c)
                            .name(format!("{} outliers", series.label)),
                    );
                }
            });
    }

    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &LineChart, id: &str) {
        Plot::new(format!("lines_{id}"))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default().position(egui_plot::Corner::LeftTop))
            .x_axis_label(chart.axes.x_label.clone())
            .y_axis_label(chart.axes.y_label.clone())
            .include_y(0.0)
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    let c = color(palette::series_color(i));
                    plot_ui.line(
                        Line::new(PlotPoints::new(series.points.clone()))
                            .color(c)
                            .width(2.0)
                            .name(&series.label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::new(series.points.clone()))
                            .radius(3.5)
                            .color(c)
                            .name(&series.label),
                    );
                }
            });
    }

    /// Annotated grid of colored cells.
    pub fn draw_heatmap(ui: &mut egui::Ui, chart: &Heatmap, id: &str) {
        egui::Grid::new(ui.make_persistent_id(format!("heatmap_{id}")))
            .spacing([2.0, 2.0])
            .show(ui, |ui| {
                ui.label("");
                for label in &chart.labels {
                    ui.label(RichText::new(label).size(11.0).strong());
                }
                ui.end_row();

                for (row_label, row) in chart.labels.iter().zip(chart.matrix.iter()) {
                    ui.label(RichText::new(row_label).size(11.0).strong());
                    for &value in row {
                        let (rect, response) =
                            ui.allocate_exact_size(HEAT_CELL, egui::Sense::hover());
                        ui.painter()
                            .rect_filled(rect, 2.0, color(palette::coolwarm(value)));
                        let text = if value.is_nan() {
                            "-".to_string()
                        } else {
                            format!("{:.2}", value)
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            &text,
                            egui::FontId::proportional(13.0),
                            color(palette::text_on(value)),
                        );
                        response.on_hover_text(text);
                    }
                    ui.end_row();
                }
            });
    }

    /// Draw statistics table
    pub fn draw_stats_table(ui: &mut egui::Ui, table: &StatsTable, id: &str) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("stats_table_{id}")))
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Season", "N", "Mean", "Median", "Std", "P05", "P95"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for gs in &table.rows {
                            ui.label(RichText::new(&gs.group_name).size(11.0));
                            ui.label(RichText::new(gs.count.to_string()).size(11.0));
                            ui.label(RichText::new(format!("{:.1}", gs.mean)).size(11.0));
                            ui.label(RichText::new(format!("{:.1}", gs.median)).size(11.0));
                            ui.label(RichText::new(format!("{:.1}", gs.std)).size(11.0));
                            ui.label(RichText::new(format!("{:.1}", gs.p05)).size(11.0));
                            ui.label(RichText::new(format!("{:.1}", gs.p95)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
