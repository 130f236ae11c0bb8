//! User-selected filter parameters.

use crate::data::{
    hour_bounds, DailyDataset, DateRange, DayKind, FilterError, HourRange, HourlyDataset, Season,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The raw values coming out of the sidebar, validated only when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seasons: BTreeSet<Season>,
    pub day_kind: DayKind,
    pub min_hour: u8,
    pub max_hour: u8,
}

impl FilterParams {
    /// Everything selected: full date span, all four seasons, all days and
    /// the full observed hour bounds.
    pub fn defaults_for(daily: &DailyDataset, hourly: &HourlyDataset) -> Self {
        let (start, end) = daily
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        let hours = hour_bounds(&hourly.records, DayKind::All).unwrap_or(HourRange::FULL);

        Self {
            start,
            end,
            seasons: Season::ALL.into_iter().collect(),
            day_kind: DayKind::All,
            min_hour: hours.min(),
            max_hour: hours.max(),
        }
    }

    pub fn date_range(&self) -> Result<DateRange, FilterError> {
        DateRange::new(self.start, self.end)
    }

    pub fn hour_range(&self) -> Result<HourRange, FilterError> {
        HourRange::new(self.min_hour, self.max_hour)
    }

    /// Clamp the hour selection into the observed bounds of the current day
    /// kind. Returns whether anything changed.
    pub fn clamp_hours(&mut self, hourly: &HourlyDataset) -> bool {
        let Some(bounds) = hour_bounds(&hourly.records, self.day_kind) else {
            return false;
        };
        let Ok(requested) = self.hour_range() else {
            return false;
        };
        if requested.is_within(&bounds) {
            return false;
        }

        // A selection outside the bounds is kept and renders as an empty view.
        let Some(clamped) = requested.clamp_to(&bounds) else {
            return false;
        };
        self.min_hour = clamped.min();
        self.max_hour = clamped.max();
        true
    }
}
