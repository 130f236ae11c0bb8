//! Bike rental analytics dashboard.
//!
//! Loads a daily and an hourly rental dataset, filters them by date, season,
//! day kind and hour, and renders seasonal, weather and hourly charts either
//! in an egui window, as PNG files or as JSON.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
pub mod stats;
