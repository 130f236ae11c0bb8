//! Filter Engine
//! Applies the dashboard's user-selected predicates to the loaded records.
//! Filters borrow from the source slice and never copy or mutate records.

use super::model::{DailyRecord, DayKind, HourlyRecord, Season};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Highest valid hour of day.
pub const MAX_HOUR: u8 = 23;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Invalid hour range {min}..={max} (hours must satisfy 0 <= min <= max <= 23)")]
    InvalidHourRange { min: u8, max: u8 },
}

// ---------------------------------------------------------------------------
// Ranges
// ---------------------------------------------------------------------------

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inclusive hour-of-day range with `min <= max <= 23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    min: u8,
    max: u8,
}

impl HourRange {
    /// The whole day.
    pub const FULL: HourRange = HourRange {
        min: 0,
        max: MAX_HOUR,
    };

    pub fn new(min: u8, max: u8) -> Result<Self, FilterError> {
        if min > max || max > MAX_HOUR {
            return Err(FilterError::InvalidHourRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn contains(&self, hour: u8) -> bool {
        self.min <= hour && hour <= self.max
    }

    /// Whether `self` lies entirely inside `bounds`.
    pub fn is_within(&self, bounds: &HourRange) -> bool {
        bounds.min <= self.min && self.max <= bounds.max
    }

    /// Intersection with `bounds`; `None` when the two do not overlap.
    pub fn clamp_to(&self, bounds: &HourRange) -> Option<HourRange> {
        let min = self.min.max(bounds.min);
        let max = self.max.min(bounds.max);
        (min <= max).then_some(HourRange { min, max })
    }
}

// ---------------------------------------------------------------------------
// Daily filtering
// ---------------------------------------------------------------------------

/// Records inside `range` whose season is in `seasons`, in source order.
///
/// An empty `seasons` set selects nothing.
pub fn filter_daily<'a>(
    records: &'a [DailyRecord],
    range: &DateRange,
    seasons: &BTreeSet<Season>,
) -> Vec<&'a DailyRecord> {
    if seasons.is_empty() {
        return Vec::new();
    }

    let view: Vec<&DailyRecord> = records
        .iter()
        .filter(|r| range.contains(r.date) && seasons.contains(&r.season))
        .collect();

    debug!(
        "Daily filter {}..={} over {} season(s): {} of {} rows",
        range.start,
        range.end,
        seasons.len(),
        view.len(),
        records.len()
    );
    view
}

// ---------------------------------------------------------------------------
// Hourly filtering
// ---------------------------------------------------------------------------

/// Observed hour bounds of the `day_kind` subset, or `None` if it is empty.
pub fn hour_bounds(records: &[HourlyRecord], day_kind: DayKind) -> Option<HourRange> {
    let mut hours = records
        .iter()
        .filter(|r| day_kind.matches(r.working_day))
        .map(|r| r.hour);

    let first = hours.next()?;
    let (min, max) = hours.fold((first, first), |(lo, hi), h| (lo.min(h), hi.max(h)));
    Some(HourRange { min, max })
}

/// Result of [`filter_hourly`].
#[derive(Debug, Clone)]
pub struct HourlyView<'a> {
    pub records: Vec<&'a HourlyRecord>,
    /// The hour range after clamping to the observed bounds of the day kind;
    /// `None` when the day kind has no rows or the request misses its bounds.
    pub applied: Option<HourRange>,
}

impl HourlyView<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Records matching `day_kind` whose hour lies in `hour_range`.
///
/// The requested range is first narrowed to the bounds observed in the
/// `day_kind` subset, so a range chosen under another day kind is never
/// applied as-is. A range that misses those bounds entirely selects nothing.
pub fn filter_hourly(
    records: &[HourlyRecord],
    day_kind: DayKind,
    hour_range: HourRange,
) -> HourlyView<'_> {
    let Some(bounds) = hour_bounds(records, day_kind) else {
        debug!("Hourly filter {:?}: no rows for this day kind", day_kind);
        return HourlyView {
            records: Vec::new(),
            applied: None,
        };
    };

    let Some(applied) = hour_range.clamp_to(&bounds) else {
        debug!(
            "Hour range {}..={} lies outside {}..={} for {:?}",
            hour_range.min, hour_range.max, bounds.min, bounds.max, day_kind
        );
        return HourlyView {
            records: Vec::new(),
            applied: None,
        };
    };
    if applied != hour_range {
        debug!(
            "Hour range {}..={} clamped to {}..={} for {:?}",
            hour_range.min, hour_range.max, applied.min, applied.max, day_kind
        );
    }

    let view: Vec<&HourlyRecord> = records
        .iter()
        .filter(|r| day_kind.matches(r.working_day) && applied.contains(r.hour))
        .collect();

    HourlyView {
        records: view,
        applied: Some(applied),
    }
}
