//! CSV Data Loader Module
//! Reads the daily and hourly rental CSV files into typed records using Polars,
//! and memoizes loaded datasets per source path.

use super::model::{DailyDataset, DailyRecord, HourlyDataset, HourlyRecord, Season};
use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Columns every daily source must carry.
pub const DAILY_COLUMNS: [&str; 6] = ["dteday", "season", "temp", "hum", "windspeed", "cnt"];

/// Optional hourly-averaged weather columns of the daily source.
pub const HOUR_AVG_COLUMNS: [&str; 3] = ["temp_hour_avg", "hum_hour_avg", "windspeed_hour_avg"];

/// Columns every hourly source must carry.
pub const HOURLY_COLUMNS: [&str; 4] = ["dteday", "hr", "workingday", "cnt"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("{}: missing expected column(s): {}", .path.display(), .missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },
    #[error("{}: row {row}: invalid {column} value '{value}'", .path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
}

/// Load the daily dataset from a CSV file.
pub fn load_daily(path: &Path) -> Result<DailyDataset, LoaderError> {
    let df = read_csv(path)?;
    let dataset = daily_from_frame(&df, path)?;
    info!(
        "Loaded {} daily records from {} (hourly averages: {})",
        dataset.len(),
        path.display(),
        dataset.has_hour_averages
    );
    if let Some(message) = hour_average_warning(&dataset) {
        warn!("{}", message);
    }
    Ok(dataset)
}

/// Logged once per load when correlations will fall back to raw weather.
fn hour_average_warning(dataset: &DailyDataset) -> Option<String> {
    (!dataset.has_hour_averages).then(|| {
        format!(
            "{} has no hourly-averaged weather columns; correlating raw daily values",
            dataset.source.display()
        )
    })
}

/// Load the hourly dataset from a CSV file.
pub fn load_hourly(path: &Path) -> Result<HourlyDataset, LoaderError> {
    let df = read_csv(path)?;
    let dataset = hourly_from_frame(&df, path)?;
    info!(
        "Loaded {} hourly records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;
    Ok(df)
}

/// Convert an already-read frame into daily records.
pub fn daily_from_frame(df: &DataFrame, path: &Path) -> Result<DailyDataset, LoaderError> {
    check_schema(df, path, &DAILY_COLUMNS)?;

    let names = column_names(df);
    let has_hour_averages = HOUR_AVG_COLUMNS
        .iter()
        .all(|c| names.iter().any(|n| n == c));

    let dates = str_column(df, "dteday")?;
    let seasons = int_column(df, "season", path)?;
    let temp = float_column(df, "temp")?;
    let hum = float_column(df, "hum")?;
    let windspeed = float_column(df, "windspeed")?;
    let cnt = int_column(df, "cnt", path)?;
    let optional = |name: &str| -> Result<Vec<Option<f64>>, LoaderError> {
        if names.iter().any(|n| n == name) {
            float_column(df, name)
        } else {
            Ok(vec![None; df.height()])
        }
    };
    let temp_hour_avg = optional("temp_hour_avg")?;
    let hum_hour_avg = optional("hum_hour_avg")?;
    let windspeed_hour_avg = optional("windspeed_hour_avg")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = i + 1;
        let date = parse_date_cell(dates[i].as_deref(), path, row)?;
        let season_code = match seasons[i] {
            Some(code) => code,
            None => return Err(parse_error(path, row, "season", "<null>")),
        };
        let cnt = count_cell(cnt[i], path, row)?;

        records.push(DailyRecord {
            date,
            season_code,
            season: Season::from_code(season_code),
            temp: temp[i],
            hum: hum[i],
            windspeed: windspeed[i],
            temp_hour_avg: temp_hour_avg[i],
            hum_hour_avg: hum_hour_avg[i],
            windspeed_hour_avg: windspeed_hour_avg[i],
            cnt,
        });
    }

    Ok(DailyDataset {
        source: path.to_path_buf(),
        records,
        has_hour_averages,
    })
}

/// Convert an already-read frame into hourly records.
pub fn hourly_from_frame(df: &DataFrame, path: &Path) -> Result<HourlyDataset, LoaderError> {
    check_schema(df, path, &HOURLY_COLUMNS)?;

    let dates = str_column(df, "dteday")?;
    let hours = int_column(df, "hr", path)?;
    let working = int_column(df, "workingday", path)?;
    let cnt = int_column(df, "cnt", path)?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = i + 1;
        let date = parse_date_cell(dates[i].as_deref(), path, row)?;
        let hour = match hours[i] {
            Some(h @ 0..=23) => h as u8,
            other => return Err(parse_error(path, row, "hr", &display_cell(other))),
        };
        let working_day = match working[i] {
            Some(w @ 0..=1) => w as u8,
            other => return Err(parse_error(path, row, "workingday", &display_cell(other))),
        };
        let cnt = count_cell(cnt[i], path, row)?;

        records.push(HourlyRecord {
            date,
            hour,
            working_day,
            cnt,
        });
    }

    Ok(HourlyDataset {
        source: path.to_path_buf(),
        records,
    })
}

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn check_schema(df: &DataFrame, path: &Path, required: &[&str]) -> Result<(), LoaderError> {
    let names = column_names(df);
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !names.iter().any(|n| n == *c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoaderError::Schema {
            path: path.to_path_buf(),
            missing,
        })
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Whole-number column. Fractional cells are rejected rather than truncated.
fn int_column(df: &DataFrame, name: &str, path: &Path) -> Result<Vec<Option<i64>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    column
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            None => Ok(None),
            Some(x) if x.is_finite() && x.fract() == 0.0 => Ok(Some(x as i64)),
            Some(x) => Err(parse_error(path, i + 1, name, &x.to_string())),
        })
        .collect()
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_date_cell(raw: Option<&str>, path: &Path, row: usize) -> Result<NaiveDate, LoaderError> {
    match raw {
        Some(text) => {
            parse_date(text).ok_or_else(|| parse_error(path, row, "dteday", text))
        }
        None => Err(parse_error(path, row, "dteday", "<null>")),
    }
}

fn count_cell(raw: Option<i64>, path: &Path, row: usize) -> Result<u32, LoaderError> {
    raw.and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| parse_error(path, row, "cnt", &display_cell(raw)))
}

fn display_cell(raw: Option<i64>) -> String {
    raw.map(|v| v.to_string())
        .unwrap_or_else(|| "<null>".to_string())
}

fn parse_error(path: &Path, row: usize, column: &str, value: &str) -> LoaderError {
    LoaderError::Parse {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

/// Load-once store of datasets keyed by source path.
///
/// Entries live until [`DatasetCache::invalidate`] or [`DatasetCache::clear`]
/// is called, or the process exits. Cached datasets are shared read-only.
#[derive(Default)]
pub struct DatasetCache {
    daily: HashMap<PathBuf, Arc<DailyDataset>>,
    hourly: HashMap<PathBuf, Arc<HourlyDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the daily dataset for `path`, loading it on first use.
    pub fn daily(&mut self, path: &Path) -> Result<Arc<DailyDataset>, LoaderError> {
        if let Some(ds) = self.daily.get(path) {
            debug!("Daily cache hit: {}", path.display());
            return Ok(Arc::clone(ds));
        }
        debug!("Daily cache miss: {}", path.display());
        let ds = Arc::new(load_daily(path)?);
        self.daily.insert(path.to_path_buf(), Arc::clone(&ds));
        Ok(ds)
    }

    /// Get the hourly dataset for `path`, loading it on first use.
    pub fn hourly(&mut self, path: &Path) -> Result<Arc<HourlyDataset>, LoaderError> {
        if let Some(ds) = self.hourly.get(path) {
            debug!("Hourly cache hit: {}", path.display());
            return Ok(Arc::clone(ds));
        }
        debug!("Hourly cache miss: {}", path.display());
        let ds = Arc::new(load_hourly(path)?);
        self.hourly.insert(path.to_path_buf(), Arc::clone(&ds));
        Ok(ds)
    }

    /// Drop any dataset cached for `path`.
    pub fn invalidate(&mut self, path: &Path) {
        self.daily.remove(path);
        self.hourly.remove(path);
    }

    pub fn clear(&mut self) {
        self.daily.clear();
        self.hourly.clear();
    }

    /// Number of cached datasets of either kind.
    pub fn len(&self) -> usize {
        self.daily.len() + self.hourly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_daily_from_frame_derives_season_name() {
        let df = df!(
            "dteday" => ["2011-01-01", "2011-01-02", "2011-01-03"],
            "season" => [1i64, 1, 4],
            "temp" => [0.34, 0.36, 0.19],
            "hum" => [0.80, 0.69, 0.43],
            "windspeed" => [0.16, 0.24, 0.24],
            "cnt" => [100i64, 150, 200]
        )
        .unwrap();

        let ds = daily_from_frame(&df, Path::new("day.csv")).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(!ds.has_hour_averages);
        assert_eq!(ds.records[0].season, Season::Spring);
        assert_eq!(ds.records[2].season, Season::Winter);
        assert_eq!(ds.records[2].season_code, 4);
        assert_eq!(ds.records[1].cnt, 150);
        assert_eq!(
            ds.records[1].date,
            NaiveDate::from_ymd_opt(2011, 1, 2).unwrap()
        );
        assert_eq!(ds.records[0].temp_hour_avg, None);
    }

    #[test]
    fn test_daily_unknown_season_code_is_kept() {
        let df = df!(
            "dteday" => ["2011-01-01"],
            "season" => [9i64],
            "temp" => [0.3],
            "hum" => [0.5],
            "windspeed" => [0.1],
            "cnt" => [42i64]
        )
        .unwrap();

        let ds = daily_from_frame(&df, Path::new("day.csv")).unwrap();
        assert_eq!(ds.records[0].season, Season::Unknown);
    }

    #[test]
    fn test_daily_hour_average_columns_detected() {
        let df = df!(
            "dteday" => ["2011-01-01"],
            "season" => [1i64],
            "temp" => [0.3],
            "hum" => [0.5],
            "windspeed" => [0.1],
            "cnt" => [42i64],
            "temp_hour_avg" => [0.31],
            "hum_hour_avg" => [0.52],
            "windspeed_hour_avg" => [0.12]
        )
        .unwrap();

        let ds = daily_from_frame(&df, Path::new("day.csv")).unwrap();
        assert!(ds.has_hour_averages);
        assert_eq!(ds.records[0].hum_hour_avg, Some(0.52));
    }

    #[test]
    fn test_hour_average_warning_only_without_columns() {
        let raw = df!(
            "dteday" => ["2011-01-01"],
            "season" => [1i64],
            "temp" => [0.3],
            "hum" => [0.5],
            "windspeed" => [0.1],
            "cnt" => [42i64]
        )
        .unwrap();
        let ds = daily_from_frame(&raw, Path::new("day.csv")).unwrap();
        let message = hour_average_warning(&ds).unwrap();
        assert!(message.starts_with("day.csv"));

        let ds = load_daily(&fixture("day_hour_avg.csv")).unwrap();
        assert_eq!(hour_average_warning(&ds), None);
    }

    #[test]
    fn test_daily_missing_column_is_schema_error() {
        let df = df!(
            "dteday" => ["2011-01-01"],
            "season" => [1i64],
            "cnt" => [42i64]
        )
        .unwrap();

        match daily_from_frame(&df, Path::new("day.csv")) {
            Err(LoaderError::Schema { missing, .. }) => {
                assert_eq!(missing, vec!["temp", "hum", "windspeed"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_daily_bad_date_is_parse_error() {
        let df = df!(
            "dteday" => ["2011-01-01", "not-a-date"],
            "season" => [1i64, 1],
            "temp" => [0.3, 0.3],
            "hum" => [0.5, 0.5],
            "windspeed" => [0.1, 0.1],
            "cnt" => [42i64, 43]
        )
        .unwrap();

        match daily_from_frame(&df, Path::new("day.csv")) {
            Err(LoaderError::Parse { row, column, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "dteday");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_hourly_from_frame() {
        let df = df!(
            "dteday" => ["2011-01-01", "2011-01-01", "2011-01-03", "2011-01-03"],
            "hr" => [5i64, 5, 10, 10],
            "workingday" => [0i64, 1, 1, 0],
            "cnt" => [3i64, 8, 40, 12]
        )
        .unwrap();

        let ds = hourly_from_frame(&df, Path::new("hour.csv")).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.records[1].working_day, 1);
        assert_eq!(ds.records[2].hour, 10);
    }

    #[test]
    fn test_hourly_out_of_range_hour_is_parse_error() {
        let df = df!(
            "dteday" => ["2011-01-01"],
            "hr" => [24i64],
            "workingday" => [0i64],
            "cnt" => [3i64]
        )
        .unwrap();

        assert!(matches!(
            hourly_from_frame(&df, Path::new("hour.csv")),
            Err(LoaderError::Parse { ref column, .. }) if column == "hr"
        ));
    }

    #[test]
    fn test_daily_fractional_codes_are_parse_errors() {
        let base = |season: f64, cnt: f64| {
            df!(
                "dteday" => ["2011-01-01"],
                "season" => [season],
                "temp" => [0.3],
                "hum" => [0.5],
                "windspeed" => [0.1],
                "cnt" => [cnt]
            )
            .unwrap()
        };

        for (df, bad) in [(base(2.7, 42.0), "season"), (base(2.0, 42.9), "cnt")] {
            match daily_from_frame(&df, Path::new("day.csv")) {
                Err(LoaderError::Parse { row, column, .. }) => {
                    assert_eq!(row, 1);
                    assert_eq!(column, bad);
                }
                other => panic!("expected parse error on {}, got {:?}", bad, other),
            }
        }

        // Whole numbers stored as floats are still accepted.
        let ds = daily_from_frame(&base(2.0, 42.0), Path::new("day.csv")).unwrap();
        assert_eq!(ds.records[0].season, Season::Summer);
        assert_eq!(ds.records[0].cnt, 42);
    }

    #[test]
    fn test_hourly_fractional_values_are_parse_errors() {
        let base = |hr: f64, workingday: f64| {
            df!(
                "dteday" => ["2011-01-01"],
                "hr" => [hr],
                "workingday" => [workingday],
                "cnt" => [3i64]
            )
            .unwrap()
        };

        for (df, bad) in [(base(5.5, 1.0), "hr"), (base(5.0, 0.9), "workingday")] {
            assert!(
                matches!(
                    hourly_from_frame(&df, Path::new("hour.csv")),
                    Err(LoaderError::Parse { ref column, .. }) if column == bad
                ),
                "expected parse error on {}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_date_accepts_timestamp_suffix() {
        let expected = NaiveDate::from_ymd_opt(2012, 12, 31);
        assert_eq!(parse_date("2012-12-31"), expected);
        assert_eq!(parse_date("2012-12-31 00:00:00"), expected);
        assert_eq!(parse_date(" 2012-12-31T00:00:00 "), expected);
        assert_eq!(parse_date("31/12/2012"), None);
    }

    #[test]
    fn test_cache_loads_once_per_path() {
        let mut cache = DatasetCache::new();
        let path = fixture("day.csv");

        let first = cache.daily(&path).unwrap();
        let second = cache.daily(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.invalidate(&path);
        assert!(cache.is_empty());
        let third = cache.daily(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));

        cache.hourly(&fixture("hour.csv")).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut cache = DatasetCache::new();
        assert!(cache.daily(&fixture("does_not_exist.csv")).is_err());
        assert!(cache.is_empty());
    }
}
