//! Static Chart Renderer
//! Renders chart requests to PNG files with plotters.
//!
//! One image per request:
//! - Bar: one bar per category, gaps labelled "no data"
//! - Box: quartile box, median line, whiskers, outlier dots
//! - Heatmap: annotated correlation cells on a cool/warm scale
//! - Lines: one colored line with markers per series, plus legend
//! - Table: plain monospaced statistics table

use super::palette::{self, Rgb};
use super::request::{BarChart, BoxChart, ChartRequest, Heatmap, LineChart, StatsTable};
use crate::dashboard::Dashboard;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (900, 760);
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart of `dashboard` into `out_dir` as numbered PNGs.
    pub fn export_dashboard(
        dashboard: &Dashboard,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(out_dir)?;

        let mut written = Vec::new();
        for (i, chart) in dashboard.charts().enumerate() {
            let path = out_dir.join(format!("{:02}_{}.png", i + 1, Self::slug(chart.title())));
            Self::render_to_file(chart, &path)?;
            written.push(path);
        }
        info!("Exported {} chart(s) to {}", written.len(), out_dir.display());
        Ok(written)
    }

    /// Render one chart request to a PNG file.
    pub fn render_to_file(chart: &ChartRequest, path: &Path) -> Result<(), RenderError> {
        let size = match chart {
            ChartRequest::Heatmap(_) => HEATMAP_SIZE,
            ChartRequest::Table(t) => (CHART_SIZE.0, 90 + 30 * t.rows.len() as u32),
            _ => CHART_SIZE,
        };

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        match chart {
            ChartRequest::Bar(c) => Self::draw_bar(&root, c)?,
            ChartRequest::Box(c) => Self::draw_box(&root, c)?,
            ChartRequest::Heatmap(c) => Self::draw_heatmap(&root, c)?,
            ChartRequest::Lines(c) => Self::draw_lines(&root, c)?,
            ChartRequest::Table(t) => Self::draw_table(&root, t)?,
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Lowercase ASCII file-name stem for a chart title.
    pub fn slug(title: &str) -> String {
        let mut slug = String::new();
        for ch in title.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.ends_with('_') && !slug.is_empty() {
                slug.push('_');
            }
        }
        slug.trim_end_matches('_').to_string()
    }

    fn draw_bar<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &BarChart,
    ) -> Result<(), RenderError> {
        let n = chart.bars.len();
        let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
        let top = chart
            .bars
            .iter()
            .filter_map(|b| b.value)
            .fold(0.0, f64::max);
        let y_max = if top > 0.0 { top * 1.15 } else { 1.0 };

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.axes.title, (FONT, 26))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
            .map_err(draw_err)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| category_label(&labels, *x))
            .x_desc(chart.axes.x_label.as_str())
            .y_desc(chart.axes.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        cc.draw_series(chart.bars.iter().enumerate().filter_map(|(i, bar)| {
            let value = bar.value?;
            let x = i as f64;
            Some(Rectangle::new(
                [(x - 0.3, 0.0), (x + 0.3, value)],
                rgb(palette::category_color(i)).filled(),
            ))
        }))
        .map_err(draw_err)?;

        let centered = Pos::new(HPos::Center, VPos::Bottom);
        cc.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let (text, y) = match bar.value {
                Some(v) => (format!("{:.0}", v), v),
                None => ("no data".to_string(), 0.0),
            };
            Text::new(
                text,
                (i as f64, y + y_max * 0.01),
                (FONT, 16).into_font().color(&BLACK).pos(centered),
            )
        }))
        .map_err(draw_err)?;

        Ok(())
    }

    fn draw_box<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &BoxChart,
    ) -> Result<(), RenderError> {
        let n = chart.boxes.len();
        let labels: Vec<String> = chart.boxes.iter().map(|b| b.label.clone()).collect();
        let (lo, hi) = chart
            .boxes
            .iter()
            .flat_map(|b| b.values.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) };
        let pad = ((hi - lo) * 0.1).max(1.0);

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.axes.title, (FONT, 26))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n.max(1) as f64 - 0.5), (lo - pad)..(hi + pad))
            .map_err(draw_err)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| category_label(&labels, *x))
            .x_desc(chart.axes.x_label.as_str())
            .y_desc(chart.axes.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (i, series) in chart.boxes.iter().enumerate() {
            let c = rgb(palette::category_color(i));
            let s = &series.summary;
            let x = i as f64;

            cc.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.25, s.q1), (x + 0.25, s.q3)],
                c.mix(0.35).filled(),
            )))
            .map_err(draw_err)?;
            cc.draw_series(std::iter::once(Rectangle::new(
                [(x - 0.25, s.q1), (x + 0.25, s.q3)],
                c.stroke_width(2),
            )))
            .map_err(draw_err)?;

            let segments = vec![
                vec![(x - 0.25, s.median), (x + 0.25, s.median)],
                vec![(x, s.q3), (x, s.whisker_high)],
                vec![(x, s.q1), (x, s.whisker_low)],
                vec![(x - 0.1, s.whisker_high), (x + 0.1, s.whisker_high)],
                vec![(x - 0.1, s.whisker_low), (x + 0.1, s.whisker_low)],
            ];
            cc.draw_series(
                segments
                    .into_iter()
                    .map(|points| PathElement::new(points, c.stroke_width(2))),
            )
            .map_err(draw_err)?;

            cc.draw_series(
                series
                    .values
                    .iter()
                    .filter(|&&v| v < s.whisker_low || v > s.whisker_high)
                    .map(|&v| Circle::new((x, v), 4, c.filled())),
            )
            .map_err(draw_err)?;
        }

        Ok(())
    }

    fn draw_heatmap<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &Heatmap,
    ) -> Result<(), RenderError> {
        let n = chart.labels.len();
        let top = n as f64 - 0.5;
        // Row 0 is drawn at the top.
        let row_y = |row: usize| (n - 1 - row) as f64;
        let x_labels = chart.labels.clone();
        let y_labels: Vec<String> = chart.labels.iter().rev().cloned().collect();

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.axes.title, (FONT, 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(170)
            .build_cartesian_2d(-0.5f64..top, -0.5f64..top)
            .map_err(draw_err)?;

        cc.configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|x| category_label(&x_labels, *x))
            .y_label_formatter(&|y| category_label(&y_labels, *y))
            .draw()
            .map_err(draw_err)?;

        let cells: Vec<(usize, usize, f64)> = chart
            .matrix
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| (r, c, v)))
            .collect();

        cc.draw_series(cells.iter().map(|&(r, c, v)| {
            let x = c as f64;
            let y = row_y(r);
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                rgb(palette::coolwarm(v)).filled(),
            )
        }))
        .map_err(draw_err)?;

        let centered = Pos::new(HPos::Center, VPos::Center);
        cc.draw_series(cells.iter().map(|&(r, c, v)| {
            let text = if v.is_nan() {
                "-".to_string()
            } else {
                format!("{:.2}", v)
            };
            Text::new(
                text,
                (c as f64, row_y(r)),
                (FONT, 20)
                    .into_font()
                    .color(&rgb(palette::text_on(v)))
                    .pos(centered),
            )
        }))
        .map_err(draw_err)?;

        Ok(())
    }

    fn draw_lines<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &LineChart,
    ) -> Result<(), RenderError> {
        let points = chart.series.iter().flat_map(|s| s.points.iter());
        let (x_lo, x_hi, y_hi) = points.fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0f64),
            |(xl, xh, yh), p| (xl.min(p[0]), xh.max(p[0]), yh.max(p[1])),
        );
        let (x_lo, x_hi) = if x_lo.is_finite() { (x_lo, x_hi) } else { (0.0, 23.0) };
        let y_max = if y_hi > 0.0 { y_hi * 1.1 } else { 1.0 };

        let mut cc = ChartBuilder::on(root)
            .caption(&chart.axes.title, (FONT, 26))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((x_lo - 0.5)..(x_hi + 0.5), 0f64..y_max)
            .map_err(draw_err)?;

        cc.configure_mesh()
            .x_labels(24)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_desc(chart.axes.x_label.as_str())
            .y_desc(chart.axes.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (i, series) in chart.series.iter().enumerate() {
            let c = rgb(palette::series_color(i));
            cc.draw_series(LineSeries::new(
                series.points.iter().map(|p| (p[0], p[1])),
                c.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], c.stroke_width(2)));

            cc.draw_series(
                series
                    .points
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), 4, c.filled())),
            )
            .map_err(draw_err)?;
        }

        cc.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        Ok(())
    }

    fn draw_table<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        table: &StatsTable,
    ) -> Result<(), RenderError> {
        root.draw(&Text::new(
            table.title.clone(),
            (20, 15),
            (FONT, 24).into_font().color(&BLACK),
        ))
        .map_err(draw_err)?;

        let mut lines = vec![format!(
            "{:<10}{:>8}{:>12}{:>12}{:>12}{:>12}{:>12}",
            "Season", "N", "Mean", "Median", "Std", "P05", "P95"
        )];
        for gs in &table.rows {
            lines.push(format!(
                "{:<10}{:>8}{:>12.1}{:>12.1}{:>12.1}{:>12.1}{:>12.1}",
                gs.group_name, gs.count, gs.mean, gs.median, gs.std, gs.p05, gs.p95
            ));
        }

        for (i, line) in lines.into_iter().enumerate() {
            root.draw(&Text::new(
                line,
                (20, 60 + 30 * i as i32),
                ("monospace", 18).into_font().color(&BLACK),
            ))
            .map_err(draw_err)?;
        }
        Ok(())
    }
}
