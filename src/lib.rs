// Expense Tracker - Core Library
// Record store, flat-file codec and monthly summary; the TUI in main.rs is a thin shell over these.

pub mod codec;
pub mod config;
pub mod form;
pub mod logging;
pub mod store;
pub mod summary;
pub mod transaction;

// Re-export commonly used types
pub use codec::{
    decode, encode, load_file, parse_line, save_file, serialize, LoadOutcome, LoadReport,
    ParseError,
};
pub use config::AppConfig;
pub use form::{AddTransactionForm, FormError, FormField, PeriodField, PeriodPicker};
pub use store::RecordStore;
pub use summary::{aggregate, MonthlySummary};
pub use transaction::{Period, Transaction, TransactionType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
