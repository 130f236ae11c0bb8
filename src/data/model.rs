//! Record types for the daily and hourly rental datasets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Time-of-year category derived from the numeric `season` column.
///
/// Ordering follows the calendar of the source data, so a `BTreeMap` keyed by
/// `Season` iterates Spring → Summer → Fall → Winter, with `Unknown` last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    Unknown,
}

impl Season {
    /// The four real seasons, in axis order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Map a season code to its name. Codes outside 1..=4 are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Season::Spring,
            2 => Season::Summer,
            3 => Season::Fall,
            4 => Season::Winter,
            _ => Season::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// DayKind
// ---------------------------------------------------------------------------

/// Tri-state selector over the hourly `workingday` flag.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum DayKind {
    #[default]
    All,
    WorkingDay,
    NonWorkingDay,
}

impl DayKind {
    /// Whether a record with the given raw flag belongs to this kind.
    pub fn matches(&self, working_day: u8) -> bool {
        match self {
            DayKind::All => true,
            DayKind::WorkingDay => working_day == 1,
            DayKind::NonWorkingDay => working_day == 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayKind::All => "All days",
            DayKind::WorkingDay => "Working days",
            DayKind::NonWorkingDay => "Non-working days",
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One row of the daily dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Raw season code as read from the source.
    pub season_code: i64,
    /// Always `Season::from_code(season_code)`.
    pub season: Season,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    pub windspeed: Option<f64>,
    pub temp_hour_avg: Option<f64>,
    pub hum_hour_avg: Option<f64>,
    pub windspeed_hour_avg: Option<f64>,
    pub cnt: u32,
}

/// One row of the hourly dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    /// Hour of day, 0..=23.
    pub hour: u8,
    /// Raw working-day flag, 0 or 1.
    pub working_day: u8,
    pub cnt: u32,
}

/// Numeric daily columns addressable by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DailyField {
    Temp,
    Hum,
    Windspeed,
    TempHourAvg,
    HumHourAvg,
    WindspeedHourAvg,
    Count,
}

impl DailyField {
    /// Source column name.
    pub fn column(&self) -> &'static str {
        match self {
            DailyField::Temp => "temp",
            DailyField::Hum => "hum",
            DailyField::Windspeed => "windspeed",
            DailyField::TempHourAvg => "temp_hour_avg",
            DailyField::HumHourAvg => "hum_hour_avg",
            DailyField::WindspeedHourAvg => "windspeed_hour_avg",
            DailyField::Count => "cnt",
        }
    }

    pub fn value(&self, record: &DailyRecord) -> Option<f64> {
        match self {
            DailyField::Temp => record.temp,
            DailyField::Hum => record.hum,
            DailyField::Windspeed => record.windspeed,
            DailyField::TempHourAvg => record.temp_hour_avg,
            DailyField::HumHourAvg => record.hum_hour_avg,
            DailyField::WindspeedHourAvg => record.windspeed_hour_avg,
            DailyField::Count => Some(record.cnt as f64),
        }
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// Immutable daily snapshot loaded from one source.
#[derive(Debug, Clone)]
pub struct DailyDataset {
    pub source: PathBuf,
    pub records: Vec<DailyRecord>,
    /// Whether the source carried `temp_hour_avg`, `hum_hour_avg` and
    /// `windspeed_hour_avg`.
    pub has_hour_averages: bool,
}

impl DailyDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date present, if any.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

/// Immutable hourly snapshot loaded from one source.
#[derive(Debug, Clone)]
pub struct HourlyDataset {
    pub source: PathBuf,
    pub records: Vec<HourlyRecord>,
}

impl HourlyDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_mapping_is_total() {
        assert_eq!(Season::from_code(1), Season::Spring);
        assert_eq!(Season::from_code(2), Season::Summer);
        assert_eq!(Season::from_code(3), Season::Fall);
        assert_eq!(Season::from_code(4), Season::Winter);
        assert_eq!(Season::from_code(0), Season::Unknown);
        assert_eq!(Season::from_code(7), Season::Unknown);
        assert_eq!(Season::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_season_order_follows_calendar() {
        let mut seasons = vec![Season::Winter, Season::Unknown, Season::Spring, Season::Fall];
        seasons.sort();
        assert_eq!(
            seasons,
            vec![Season::Spring, Season::Fall, Season::Winter, Season::Unknown]
        );
    }

    #[test]
    fn test_day_kind_matches() {
        assert!(DayKind::All.matches(0));
        assert!(DayKind::All.matches(1));
        assert!(DayKind::WorkingDay.matches(1));
        assert!(!DayKind::WorkingDay.matches(0));
        assert!(DayKind::NonWorkingDay.matches(0));
        assert!(!DayKind::NonWorkingDay.matches(1));
    }

    #[test]
    fn test_date_bounds() {
        let record = |d: u32| DailyRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, d).unwrap(),
            season_code: 1,
            season: Season::Spring,
            temp: None,
            hum: None,
            windspeed: None,
            temp_hour_avg: None,
            hum_hour_avg: None,
            windspeed_hour_avg: None,
            cnt: 0,
        };
        let ds = DailyDataset {
            source: PathBuf::from("day.csv"),
            records: vec![record(5), record(2), record(9)],
            has_hour_averages: false,
        };
        let (min, max) = ds.date_bounds().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2011, 1, 2).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2011, 1, 9).unwrap());

        let empty = DailyDataset {
            records: Vec::new(),
            ..ds
        };
        assert!(empty.date_bounds().is_none());
    }
}
