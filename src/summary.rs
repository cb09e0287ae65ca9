use crate::codec::format_amount;
use crate::transaction::{Period, Transaction, TransactionType};

/// Income, expense and net savings for one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    pub period: Period,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_savings: f64,
}

impl MonthlySummary {
    /// Human-readable report, one figure per line
    pub fn message(&self) -> String {
        format!(
            "Monthly Summary for {}:\nTotal Income: {}\nTotal Expense: {}\nNet Savings: {}",
            self.period,
            format_amount(self.total_income),
            format_amount(self.total_expense),
            format_amount(self.net_savings),
        )
    }
}

/// Sum income and expense amounts for records whose date equals `period`.
///
/// Types are matched case-insensitively; records of any other type are
/// ignored. Plain `f64` sums, no rounding.
pub fn aggregate<'a, I>(records: I, period: Period) -> MonthlySummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let key = period.key();
    let mut total_income = 0.0;
    let mut total_expense = 0.0;

    for tx in records.into_iter().filter(|tx| tx.is_in(&key)) {
        if TransactionType::Income.matches(&tx.kind) {
            total_income += tx.amount;
        } else if TransactionType::Expense.matches(&tx.kind) {
            total_expense += tx.amount;
        }
    }

    MonthlySummary {
        period,
        total_income,
        total_expense,
        net_savings: total_income - total_expense,
    }
}
