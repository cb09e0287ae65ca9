use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Application settings.
///
/// Nothing is read from disk or the command line; `main` builds the defaults
/// and hands them to the logging setup and the UI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where tracing output goes (the terminal belongs to the UI)
    pub log_file: PathBuf,
    /// Path pre-filled in the load/save prompts
    pub default_data_file: PathBuf,
    /// Bounds of the year spinners
    pub years: RangeInclusive<i32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("expense-tracker.log"),
            default_data_file: PathBuf::from("transactions.txt"),
            years: 2000..=2100,
        }
    }
}
