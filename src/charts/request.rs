//! Chart Requests
//! Renderer-independent descriptions of every chart on the dashboard, and the
//! mapping from aggregated results onto them.

use crate::data::{DailyRecord, Season};
use crate::stats::{BoxSummary, Correlation, GroupStats, Mean, StatsCalculator};
use serde::Serialize;
use std::collections::BTreeMap;

/// Title and axis labels shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Axes {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        }
    }
}

/// One bar. `None` marks a category with no data, which is not the same as
/// a zero-height bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub axes: Axes,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxChart {
    pub axes: Axes,
    pub boxes: Vec<BoxSeries>,
}

/// Square matrix with the same labels on both axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub axes: Axes,
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub axes: Axes,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    pub title: String,
    pub rows: Vec<GroupStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartRequest {
    Bar(BarChart),
    Box(BoxChart),
    Heatmap(Heatmap),
    Lines(LineChart),
    Table(StatsTable),
}

impl ChartRequest {
    pub fn title(&self) -> &str {
        match self {
            ChartRequest::Bar(c) => &c.axes.title,
            ChartRequest::Box(c) => &c.axes.title,
            ChartRequest::Heatmap(c) => &c.axes.title,
            ChartRequest::Lines(c) => &c.axes.title,
            ChartRequest::Table(t) => &t.title,
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation adapter
// ---------------------------------------------------------------------------

/// Legend label for a raw working-day flag.
pub fn working_day_label(flag: u8) -> &'static str {
    if flag == 1 {
        "Working day"
    } else {
        "Non-working day"
    }
}

/// Bar chart of per-season means over the full Spring..Winter axis.
pub fn season_bar_chart(means: &BTreeMap<Season, Mean>) -> ChartRequest {
    let bars = Season::ALL
        .iter()
        .map(|season| Bar {
            label: season.name().to_string(),
            value: means.get(season).map(|m| m.value),
        })
        .collect();

    ChartRequest::Bar(BarChart {
        axes: Axes::new("Average Rentals by Season", "Season", "Average Rentals"),
        bars,
    })
}

/// Daily counts grouped by season, in season order, skipping empty seasons.
pub fn counts_by_season(records: &[&DailyRecord]) -> BTreeMap<Season, Vec<f64>> {
    let mut groups: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(r.season).or_default().push(r.cnt as f64);
    }
    groups
}

/// Box plot of raw daily counts per season.
pub fn season_box_chart(groups: &BTreeMap<Season, Vec<f64>>) -> ChartRequest {
    let boxes = groups
        .iter()
        .filter_map(|(season, values)| {
            let summary = StatsCalculator::box_summary(values)?;
            Some(BoxSeries {
                label: season.name().to_string(),
                values: values.clone(),
                summary,
            })
        })
        .collect();

    ChartRequest::Box(BoxChart {
        axes: Axes::new("Rental Distribution by Season", "Season", "Rentals"),
        boxes,
    })
}

/// Descriptive statistics per season.
pub fn season_stats_table(groups: &BTreeMap<Season, Vec<f64>>) -> ChartRequest {
    let rows = groups
        .iter()
        .map(|(season, values)| {
            let mut stats = StatsCalculator::compute_descriptive_stats(values);
            stats.group_name = season.name().to_string();
            stats
        })
        .collect();

    ChartRequest::Table(StatsTable {
        title: "Daily Rental Statistics by Season".to_string(),
        rows,
    })
}

/// Heatmap of a correlation matrix, labelled by source column.
pub fn correlation_heatmap(correlation: &Correlation) -> ChartRequest {
    let labels = correlation
        .fields
        .iter()
        .map(|f| f.column().to_string())
        .collect();

    ChartRequest::Heatmap(Heatmap {
        axes: Axes::new("Correlation between Weather and Rentals", "", ""),
        labels,
        matrix: correlation.matrix.clone(),
    })
}

/// One line per working-day flag from `(hour, flag, mean)` rows.
pub fn hourly_line_chart(rows: &[(u8, u8, f64)]) -> ChartRequest {
    let mut by_flag: BTreeMap<u8, Vec<[f64; 2]>> = BTreeMap::new();
    for &(hour, flag, mean) in rows {
        by_flag
            .entry(flag)
            .or_default()
            .push([hour as f64, mean]);
    }

    let series = by_flag
        .into_iter()
        .map(|(flag, mut points)| {
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));
            LineSeries {
                label: working_day_label(flag).to_string(),
                points,
            }
        })
        .collect();

    ChartRequest::Lines(LineChart {
        axes: Axes::new(
            "Hourly Rental Pattern: Working vs Non-working Days",
            "Hour of Day",
            "Average Rentals",
        ),
        series,
    })
}
