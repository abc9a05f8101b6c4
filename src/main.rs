use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use superstore_dashboard::app::DashboardApp;
use superstore_dashboard::settings::{Settings, DEFAULT_CONFIG_FILE};

/// Interactive dashboard over the Global Superstore sales table.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sales CSV to open; overrides the settings file and SUPERSTORE_DATA_PATH.
    data_path: Option<PathBuf>,

    /// JSON settings file. Missing is fine.
    #[arg(long, env = "SUPERSTORE_DASHBOARD_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config, cli.data_path)?;
    log::info!("Using dataset {}", settings.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Global Superstore Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the dashboard window: {e}"))
}
