// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;

use expense_tracker::{logging, AppConfig, VERSION};

fn main() -> Result<()> {
    let config = AppConfig::default();
    logging::init(&config)?;

    tracing::info!(version = VERSION, "Starting expense tracker");
    run_ui_mode(config)?;
    tracing::info!("Expense tracker closed");

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: AppConfig) -> Result<()> {
    // The store lives for the whole session and is owned by the UI
    let mut app = ui::App::new(expense_tracker::RecordStore::new(), config);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
