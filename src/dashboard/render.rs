//! Pure dashboard rendering: filter parameters in, chart requests out.

use super::params::FilterParams;
use super::{Dashboard, Metrics, Notice, Panel, Section};
use crate::charts::request::{
    correlation_heatmap, counts_by_season, hourly_line_chart, season_bar_chart, season_box_chart,
    season_stats_table,
};
use crate::data::{
    filter_daily, filter_hourly, DailyDataset, DailyRecord, FilterError, HourlyDataset,
    HourlyView,
};
use crate::stats::{mean_by_category, mean_by_two_keys, weather_correlation, FieldSet};

pub const TITLE: &str = "Bike Sharing Rental Analysis";

const INTRO: [&str; 2] = [
    "How weather and season affect the number of bike rentals.",
    "How hourly rental patterns differ between working days and non-working days.",
];

const INSIGHTS: [&str; 2] = [
    "Season and weather: rental volume differs by season, typically peaking in summer and \
     fall and dropping in winter; temperature and humidity correlate with daily rentals.",
    "Working versus non-working days: working days show two commute peaks (morning and \
     evening), while non-working days follow a single, flatter midday pattern.",
];

/// Build every section of the dashboard for one set of filter parameters.
///
/// Fails only when the parameters themselves are invalid; empty filtered
/// views render as informational notices instead of charts.
pub fn render(
    daily: &DailyDataset,
    hourly: &HourlyDataset,
    params: &FilterParams,
) -> Result<Dashboard, FilterError> {
    let date_range = params.date_range()?;
    let hour_range = params.hour_range()?;

    let daily_view = filter_daily(&daily.records, &date_range, &params.seasons);
    let hourly_view = filter_hourly(&hourly.records, params.day_kind, hour_range);

    Ok(Dashboard {
        title: TITLE.to_string(),
        intro: INTRO.iter().map(|s| s.to_string()).collect(),
        metrics: Metrics::from_view(&daily_view),
        sections: vec![
            weather_section(daily, &daily_view),
            hourly_section(&hourly_view, params),
        ],
        insights: INSIGHTS.iter().map(|s| s.to_string()).collect(),
    })
}

fn weather_section(dataset: &DailyDataset, view: &[&DailyRecord]) -> Section {
    let title = "1. Weather and Season".to_string();
    if view.is_empty() {
        return Section {
            title,
            panels: vec![Panel::Notice(Notice::info(
                "No daily records match the selected date range and seasons.",
            ))],
        };
    }

    let means = mean_by_category(view.iter().copied(), |r| r.season, |r| Some(r.cnt as f64));
    let groups = counts_by_season(view);
    let correlation = weather_correlation(dataset, view);

    let mut panels = vec![
        Panel::Chart(season_bar_chart(&means)),
        Panel::Chart(season_box_chart(&groups)),
        Panel::Chart(season_stats_table(&groups)),
    ];
    if correlation.used == FieldSet::Fallback {
        panels.push(Panel::Notice(Notice::warning(&format!(
            "Hourly-averaged weather columns were not found in {}; showing raw daily temp, hum \
             and windspeed instead.",
            dataset.source.display()
        ))));
    }
    panels.push(Panel::Chart(correlation_heatmap(&correlation)));

    Section { title, panels }
}

fn hourly_section(view: &HourlyView<'_>, params: &FilterParams) -> Section {
    let title = "2. Working Days vs Non-working Days".to_string();
    if view.is_empty() {
        return Section {
            title,
            panels: vec![Panel::Notice(Notice::info(&format!(
                "No hourly records match {} between hours {} and {}.",
                params.day_kind.label().to_lowercase(),
                params.min_hour,
                params.max_hour
            )))],
        };
    }

    let mut panels = Vec::new();
    if let Some(applied) = view.applied {
        if (applied.min(), applied.max()) != (params.min_hour, params.max_hour) {
            panels.push(Panel::Notice(Notice::info(&format!(
                "Hour range adjusted to {}..={} (observed hours for {}).",
                applied.min(),
                applied.max(),
                params.day_kind.label().to_lowercase()
            ))));
        }
    }

    let rows = mean_by_two_keys(
        view.records.iter().copied(),
        |r| r.hour,
        |r| r.working_day,
        |r| Some(r.cnt as f64),
    );
    panels.push(Panel::Chart(hourly_line_chart(&rows)));

    Section { title, panels }
}
