//! Per-user dashboard state over shared, immutable datasets.

use super::params::FilterParams;
use super::render::render;
use super::Dashboard;
use crate::data::{hour_bounds, DailyDataset, HourRange, HourlyDataset};
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

pub struct Session {
    daily: Arc<DailyDataset>,
    hourly: Arc<HourlyDataset>,
    params: FilterParams,
    dashboard: Dashboard,
    warning: Option<String>,
}

impl Session {
    /// Start with everything selected.
    pub fn new(daily: Arc<DailyDataset>, hourly: Arc<HourlyDataset>) -> Self {
        let params = FilterParams::defaults_for(&daily, &hourly);
        let (dashboard, warning) = match render(&daily, &hourly, &params) {
            Ok(dashboard) => (dashboard, None),
            Err(e) => (Dashboard::blocked(&e.to_string()), Some(e.to_string())),
        };

        Self {
            daily,
            hourly,
            params,
            dashboard,
            warning,
        }
    }

    /// Apply new filter parameters.
    ///
    /// Hours outside the observed bounds of the selected day kind are clamped
    /// first. Invalid parameters keep the previous dashboard and set
    /// [`Session::warning`].
    pub fn update(&mut self, mut params: FilterParams) {
        if params.clamp_hours(&self.hourly) {
            debug!(
                "Clamped hour range to {}..={} for {:?}",
                params.min_hour, params.max_hour, params.day_kind
            );
        }

        match render(&self.daily, &self.hourly, &params) {
            Ok(dashboard) => {
                self.dashboard = dashboard;
                self.warning = None;
            }
            Err(e) => {
                warn!("Keeping previous view: {}", e);
                self.warning = Some(e.to_string());
            }
        }
        self.params = params;
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Message for the last rejected update, if the current dashboard is
    /// stale.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Selectable hour bounds under the current day kind.
    pub fn hour_bounds(&self) -> Option<HourRange> {
        hour_bounds(&self.hourly.records, self.params.day_kind)
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.daily.date_bounds()
    }

    pub fn daily(&self) -> &DailyDataset {
        &self.daily
    }

    pub fn hourly(&self) -> &HourlyDataset {
        &self.hourly
    }
}
