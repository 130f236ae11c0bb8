//! Command line and config file handling.
//!
//! Filter values are resolved in order: command line flags, then the JSON
//! config file, then defaults derived from the loaded data.

use crate::dashboard::FilterParams;
use crate::data::{DayKind, Season};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DAILY_PATH: &str = "Dashboard/all_data.csv";
pub const DEFAULT_HOURLY_PATH: &str = "Data/hour.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("Invalid config {}: {err}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        err: serde_json::Error,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "bike-dashboard",
    author,
    version,
    about = "Explore seasonal, weather and hourly bike rental patterns",
    long_about = None
)]
pub struct Cli {
    /// Daily dataset (one row per day)
    #[arg(long, value_name = "CSV")]
    pub daily: Option<PathBuf>,

    /// Hourly dataset (one row per day and hour)
    #[arg(long, value_name = "CSV")]
    pub hourly: Option<PathBuf>,

    /// JSON file with dataset paths and initial filters
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Season to include; repeat for several
    #[arg(long = "season", value_enum)]
    pub seasons: Vec<Season>,

    #[arg(long, value_enum)]
    pub day_kind: Option<DayKind>,

    #[arg(long, value_name = "HOUR")]
    pub min_hour: Option<u8>,

    #[arg(long, value_name = "HOUR")]
    pub max_hour: Option<u8>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the rendered dashboard as JSON
    Json,
    /// Write every chart as a PNG
    Export {
        #[arg(short, long, value_name = "DIR", default_value = "charts")]
        out: PathBuf,
    },
}

/// Optional filter values; unset fields fall through to the next source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOverrides {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub seasons: Option<Vec<Season>>,
    pub day_kind: Option<DayKind>,
    pub min_hour: Option<u8>,
    pub max_hour: Option<u8>,
}

impl FilterOverrides {
    /// Fields set in `self` win over `lower`.
    pub fn or(self, lower: FilterOverrides) -> FilterOverrides {
        FilterOverrides {
            start: self.start.or(lower.start),
            end: self.end.or(lower.end),
            seasons: self.seasons.or(lower.seasons),
            day_kind: self.day_kind.or(lower.day_kind),
            min_hour: self.min_hour.or(lower.min_hour),
            max_hour: self.max_hour.or(lower.max_hour),
        }
    }

    pub fn apply(&self, params: &mut FilterParams) {
        if let Some(start) = self.start {
            params.start = start;
        }
        if let Some(end) = self.end {
            params.end = end;
        }
        if let Some(seasons) = &self.seasons {
            params.seasons = seasons.iter().copied().collect();
        }
        if let Some(day_kind) = self.day_kind {
            params.day_kind = day_kind;
        }
        if let Some(min_hour) = self.min_hour {
            params.min_hour = min_hour;
        }
        if let Some(max_hour) = self.max_hour {
            params.max_hour = max_hour;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub daily_path: Option<PathBuf>,
    pub hourly_path: Option<PathBuf>,
    pub filters: FilterOverrides,
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        let config = serde_json::from_str(&text).map_err(|err| ConfigError::Json {
            path: path.to_path_buf(),
            err,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub daily_path: PathBuf,
    pub hourly_path: PathBuf,
    pub filters: FilterOverrides,
}

impl Settings {
    /// Merge the command line over an optional config file.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    pub fn merge(cli: &Cli, file: DashboardConfig) -> Self {
        let daily_path = cli
            .daily
            .clone()
            .or(file.daily_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DAILY_PATH));
        let hourly_path = cli
            .hourly
            .clone()
            .or(file.hourly_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOURLY_PATH));

        let from_cli = FilterOverrides {
            start: cli.start,
            end: cli.end,
            seasons: (!cli.seasons.is_empty()).then(|| cli.seasons.clone()),
            day_kind: cli.day_kind,
            min_hour: cli.min_hour,
            max_hour: cli.max_hour,
        };

        Self {
            daily_path,
            hourly_path,
            filters: from_cli.or(file.filters),
        }
    }
}
