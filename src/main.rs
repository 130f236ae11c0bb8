//! Bike Sharing Rental Analysis - interactive dashboard and chart export
//!
//! Without a subcommand the egui dashboard opens; `json` prints the rendered
//! dashboard and `export` writes every chart as a PNG.

use anyhow::{Context, Result};
use bike_dashboard::charts::StaticChartRenderer;
use bike_dashboard::config::{Cli, Command, Settings};
use bike_dashboard::dashboard::{render, FilterParams, TITLE};
use bike_dashboard::data::DatasetCache;
use bike_dashboard::gui::DashboardApp;
use clap::Parser;
use eframe::egui;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;

    match cli.command {
        None => run_gui(settings),
        Some(Command::Json) => {
            let dashboard = render_once(&settings)?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        }
        Some(Command::Export { out }) => {
            let dashboard = render_once(&settings)?;
            let files = StaticChartRenderer::export_dashboard(&dashboard, &out)
                .with_context(|| format!("Failed to export charts to {}", out.display()))?;
            for file in files {
                println!("{}", file.display());
            }
            Ok(())
        }
    }
}

fn render_once(settings: &Settings) -> Result<bike_dashboard::dashboard::Dashboard> {
    let mut cache = DatasetCache::new();
    let daily = cache
        .daily(&settings.daily_path)
        .with_context(|| format!("Failed to load {}", settings.daily_path.display()))?;
    let hourly = cache
        .hourly(&settings.hourly_path)
        .with_context(|| format!("Failed to load {}", settings.hourly_path.display()))?;

    let mut params = FilterParams::defaults_for(&daily, &hourly);
    settings.filters.apply(&mut params);
    params.clamp_hours(&hourly);
    info!("Rendering with {:?}", params);

    Ok(render(&daily, &hourly, &params)?)
}

fn run_gui(settings: Settings) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(TITLE),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
