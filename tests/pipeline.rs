//! End-to-end checks: CSV fixtures through the cache, session and renderer.

use bike_dashboard::charts::request::LineChart;
use bike_dashboard::charts::ChartRequest;
use bike_dashboard::dashboard::{render, FilterParams, NoticeLevel, Panel, Session};
use bike_dashboard::data::{DatasetCache, DayKind, HourRange, Season};
use chrono::NaiveDate;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn session_for(daily: &str) -> Session {
    let mut cache = DatasetCache::new();
    let daily = cache.daily(&fixture(daily)).unwrap();
    let hourly = cache.hourly(&fixture("hour.csv")).unwrap();
    Session::new(daily, hourly)
}

fn notices(panels: &[Panel], level: NoticeLevel) -> Vec<&str> {
    panels
        .iter()
        .filter_map(|p| match p {
            Panel::Notice(n) if n.level == level => Some(n.message.as_str()),
            _ => None,
        })
        .collect()
}

fn line_chart(session: &Session) -> &LineChart {
    session
        .dashboard()
        .charts()
        .find_map(|c| match c {
            ChartRequest::Lines(lines) => Some(lines),
            _ => None,
        })
        .expect("hourly line chart")
}

#[test]
fn test_default_dashboard_from_fixtures() {
    let session = session_for("day.csv");
    assert!(session.warning().is_none());

    let dashboard = session.dashboard();
    assert_eq!(dashboard.title, "Bike Sharing Rental Analysis");

    let metrics = dashboard.metrics.unwrap();
    assert_eq!(metrics.days, 8);
    assert_eq!(metrics.total_rentals, 24782);

    let bar = dashboard
        .charts()
        .find_map(|c| match c {
            ChartRequest::Bar(bar) => Some(bar),
            _ => None,
        })
        .unwrap();
    let values: Vec<Option<f64>> = bar.bars.iter().map(|b| b.value).collect();
    assert_eq!(
        values,
        vec![Some(893.0), Some(2239.5), Some(5533.5), Some(3725.0)]
    );

    // Both day kinds appear as separate lines.
    let labels: Vec<&str> = line_chart(&session)
        .series
        .iter()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Non-working day", "Working day"]);
}

#[test]
fn test_correlation_falls_back_without_hour_averages() {
    let session = session_for("day.csv");
    let weather = &session.dashboard().sections[0];
    assert_eq!(notices(&weather.panels, NoticeLevel::Warning).len(), 1);

    let heatmap = session
        .dashboard()
        .charts()
        .find_map(|c| match c {
            ChartRequest::Heatmap(h) => Some(h),
            _ => None,
        })
        .unwrap();
    assert_eq!(heatmap.labels, vec!["temp", "hum", "windspeed", "cnt"]);
    assert_eq!(heatmap.matrix.len(), 4);
    for (i, row) in heatmap.matrix.iter().enumerate() {
        assert_eq!(row[i], 1.0);
    }
}

#[test]
fn test_correlation_prefers_hour_averages() {
    let session = session_for("day_hour_avg.csv");
    let weather = &session.dashboard().sections[0];
    assert!(notices(&weather.panels, NoticeLevel::Warning).is_empty());

    let heatmap = session
        .dashboard()
        .charts()
        .find_map(|c| match c {
            ChartRequest::Heatmap(h) => Some(h),
            _ => None,
        })
        .unwrap();
    assert_eq!(heatmap.labels[0], "temp_hour_avg");
}

#[test]
fn test_empty_season_selection_shows_notice() {
    let mut session = session_for("day.csv");
    let mut params = session.params().clone();
    params.seasons.clear();
    session.update(params);

    assert!(session.warning().is_none());
    let dashboard = session.dashboard();
    assert!(dashboard.metrics.is_none());
    assert_eq!(notices(&dashboard.sections[0].panels, NoticeLevel::Info).len(), 1);
    // The hourly section is independent of the season filter.
    assert_eq!(line_chart(&session).series.len(), 2);
}

#[test]
fn test_working_days_narrow_hours_and_average_per_hour() {
    let mut session = session_for("day.csv");
    assert_eq!(session.hour_bounds(), Some(HourRange::FULL));

    let mut params = session.params().clone();
    params.day_kind = DayKind::WorkingDay;
    session.update(params);

    assert_eq!(
        session.hour_bounds().map(|r| (r.min(), r.max())),
        Some((6, 20))
    );
    assert_eq!((session.params().min_hour, session.params().max_hour), (6, 20));

    let chart = line_chart(&session);
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].label, "Working day");
    assert_eq!(
        chart.series[0].points,
        vec![[6.0, 24.0], [8.0, 300.0], [17.0, 440.0], [20.0, 150.0]]
    );
}

#[test]
fn test_hours_outside_working_day_bounds_render_empty() {
    let mut session = session_for("day.csv");
    let mut params = session.params().clone();
    params.day_kind = DayKind::WorkingDay;
    params.min_hour = 21;
    params.max_hour = 23;
    session.update(params);

    assert!(session.warning().is_none());
    assert_eq!((session.params().min_hour, session.params().max_hour), (21, 23));
    let hourly = &session.dashboard().sections[1];
    assert_eq!(notices(&hourly.panels, NoticeLevel::Info).len(), 1);
    assert!(!session
        .dashboard()
        .charts()
        .any(|c| matches!(c, ChartRequest::Lines(_))));
}

#[test]
fn test_season_and_date_filters_combine() {
    let mut session = session_for("day.csv");
    let mut params = session.params().clone();
    params.start = NaiveDate::from_ymd_opt(2011, 4, 2).unwrap();
    params.end = NaiveDate::from_ymd_opt(2011, 10, 1).unwrap();
    params.seasons = [Season::Summer, Season::Winter].into_iter().collect();
    session.update(params);

    let metrics = session.dashboard().metrics.unwrap();
    assert_eq!(metrics.days, 2);
    assert_eq!(metrics.total_rentals, 2252 + 3510);
}

#[test]
fn test_inverted_dates_are_rejected_by_render() {
    let mut cache = DatasetCache::new();
    let daily = cache.daily(&fixture("day.csv")).unwrap();
    let hourly = cache.hourly(&fixture("hour.csv")).unwrap();

    let mut params = FilterParams::defaults_for(&daily, &hourly);
    std::mem::swap(&mut params.start, &mut params.end);
    assert!(render(&daily, &hourly, &params).is_err());
}

#[test]
fn test_dashboard_serializes_to_json() {
    let session = session_for("day.csv");
    let json = serde_json::to_value(session.dashboard()).unwrap();

    assert_eq!(json["title"], "Bike Sharing Rental Analysis");
    assert_eq!(json["metrics"]["days"], 8);
    let first_panel = &json["sections"][0]["panels"][0];
    assert_eq!(first_panel["chart"]["kind"], "bar");
}
