//! Charts module - chart requests and their renderers
//!
//! `request` builds backend-neutral chart descriptions; `plotter` draws them
//! with egui_plot, `renderer` writes them to PNG with plotters.

pub mod palette;
mod plotter;
mod renderer;
pub mod request;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use request::ChartRequest;
