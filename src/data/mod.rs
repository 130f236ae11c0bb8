//! Data module - CSV loading, record types and filtering

pub mod filter;
pub mod loader;
pub mod model;

pub use filter::{
    filter_daily, filter_hourly, hour_bounds, DateRange, FilterError, HourRange, HourlyView,
};
pub use loader::{load_daily, load_hourly, DatasetCache, LoaderError};
pub use model::{
    DailyDataset, DailyField, DailyRecord, DayKind, HourlyDataset, HourlyRecord, Season,
};
