//! Dashboard module - filter parameters, rendering and session state
//!
//! ```text
//!   FilterParams ──► render() ──► Dashboard { sections: [Panel…] }
//!        ▲                              │
//!        │                              ▼
//!     Session (keeps the last valid Dashboard when params are invalid)
//! ```

mod params;
mod render;
mod session;

pub use params::FilterParams;
pub use render::{render, TITLE};
pub use session::Session;

use crate::charts::ChartRequest;
use crate::data::DailyRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// e.g. an empty filtered view.
    Info,
    /// e.g. the correlation fell back to raw weather columns.
    Warning,
    /// Blocking problems such as a failed load.
    Error,
}

/// A message shown in place of, or next to, charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: &str) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.to_string(),
        }
    }

    pub fn warning(message: &str) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Chart(ChartRequest),
    Notice(Notice),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Headline numbers for the filtered daily view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub days: usize,
    pub total_rentals: u64,
    pub average_daily_rentals: f64,
}

impl Metrics {
    /// `None` for an empty view.
    pub fn from_view(view: &[&DailyRecord]) -> Option<Self> {
        if view.is_empty() {
            return None;
        }
        let total_rentals: u64 = view.iter().map(|r| r.cnt as u64).sum();
        Some(Self {
            days: view.len(),
            total_rentals,
            average_daily_rentals: total_rentals as f64 / view.len() as f64,
        })
    }
}

/// Everything the presentation layer draws for one set of filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub intro: Vec<String>,
    pub metrics: Option<Metrics>,
    pub sections: Vec<Section>,
    pub insights: Vec<String>,
}

impl Dashboard {
    /// A dashboard holding a single blocking message.
    pub fn blocked(message: &str) -> Self {
        Self {
            title: TITLE.to_string(),
            intro: Vec::new(),
            metrics: None,
            sections: vec![Section {
                title: "Error".to_string(),
                panels: vec![Panel::Notice(Notice::error(message))],
            }],
            insights: Vec::new(),
        }
    }

    /// All chart requests, in display order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartRequest> {
        self.sections
            .iter()
            .flat_map(|s| s.panels.iter())
            .filter_map(|p| match p {
                Panel::Chart(chart) => Some(chart),
                Panel::Notice(_) => None,
            })
    }
}
