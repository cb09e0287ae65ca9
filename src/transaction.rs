use chrono::Datelike;
use std::fmt;

/// Categories offered by the add form for each transaction type.
pub const INCOME_CATEGORIES: [&str; 2] = ["Salary", "Business"];
pub const EXPENSE_CATEGORIES: [&str; 3] = ["Food", "Rent", "Travel"];

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

/// The two kinds of entry the form can create.
///
/// Records keep their type as a plain string (files may contain anything),
/// so this enum is used for creation and for matching during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// Fixed category choices for this type
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => &INCOME_CATEGORIES,
            TransactionType::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Case-insensitive comparison against a stored type string
    pub fn matches(&self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(self.as_str())
    }

    pub fn toggle(&self) -> Self {
        match self {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PERIOD KEY
// ============================================================================

/// A year-month pair, rendered as the `YYYY-MM` key stored in `Transaction::date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Returns `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Period { year, month })
        } else {
            None
        }
    }

    /// The current year and month on the local clock
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Period {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// One financial entry.
///
/// `kind` is the free-form type string ("Income"/"Expense" when created by the
/// form), and `date` is a `YYYY-MM` period key that is only ever compared for
/// equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
}

impl Transaction {
    pub fn new(
        kind: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<String>,
    ) -> Self {
        Transaction {
            kind: kind.into(),
            category: category.into(),
            amount,
            date: date.into(),
        }
    }

    /// Build a record the way the add form does
    pub fn from_form(kind: TransactionType, category: &str, amount: f64, period: Period) -> Self {
        Transaction::new(kind.as_str(), category, amount, period.key())
    }

    pub fn is_in(&self, period: &str) -> bool {
        self.date == period
    }
}
