// Form state for the interactive shell
// Pure data + key-independent editing operations, so it can be tested without a terminal.

use std::ops::RangeInclusive;
use thiserror::Error;

use crate::transaction::{Period, Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}

// ============================================================================
// PERIOD PICKER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodField {
    Year,
    Month,
}

/// Year and month spinners. Values clamp at the bounds instead of wrapping.
#[derive(Debug, Clone)]
pub struct PeriodPicker {
    year: i32,
    month: u32,
    years: RangeInclusive<i32>,
}

impl PeriodPicker {
    pub fn new(initial: Period, years: RangeInclusive<i32>) -> Self {
        let year = initial.year().clamp(*years.start(), *years.end());
        Self {
            year,
            month: initial.month(),
            years,
        }
    }

    pub fn increment(&mut self, field: PeriodField) {
        match field {
            PeriodField::Year => {
                if self.year < *self.years.end() {
                    self.year += 1;
                }
            }
            PeriodField::Month => {
                if self.month < 12 {
                    self.month += 1;
                }
            }
        }
    }

    pub fn decrement(&mut self, field: PeriodField) {
        match field {
            PeriodField::Year => {
                if self.year > *self.years.start() {
                    self.year -= 1;
                }
            }
            PeriodField::Month => {
                if self.month > 1 {
                    self.month -= 1;
                }
            }
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn period(&self) -> Period {
        // month is kept within 1..=12 by the spinner methods
        Period::new(self.year, self.month).unwrap_or_else(Period::current)
    }
}

// ============================================================================
// ADD TRANSACTION FORM
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Type,
    Category,
    Amount,
    Year,
    Month,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Type,
        FormField::Category,
        FormField::Amount,
        FormField::Year,
        FormField::Month,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Type => "Type",
            FormField::Category => "Category",
            FormField::Amount => "Amount",
            FormField::Year => "Year",
            FormField::Month => "Month",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            FormField::Type => FormField::Category,
            FormField::Category => FormField::Amount,
            FormField::Amount => FormField::Year,
            FormField::Year => FormField::Month,
            FormField::Month => FormField::Type,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Type => FormField::Month,
            FormField::Category => FormField::Type,
            FormField::Amount => FormField::Category,
            FormField::Year => FormField::Amount,
            FormField::Month => FormField::Year,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddTransactionForm {
    pub kind: TransactionType,
    pub category_index: usize,
    pub amount: String,
    pub period: PeriodPicker,
    pub focus: FormField,
}

impl AddTransactionForm {
    /// Fresh form: Income, first category, empty amount, `initial` period
    pub fn new(initial: Period, years: RangeInclusive<i32>) -> Self {
        Self {
            kind: TransactionType::Income,
            category_index: 0,
            amount: String::new(),
            period: PeriodPicker::new(initial, years),
            focus: FormField::Type,
        }
    }

    pub fn category(&self) -> &'static str {
        let categories = self.kind.categories();
        categories[self.category_index.min(categories.len() - 1)]
    }

    /// Switching type replaces the category choices
    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggle();
        self.category_index = 0;
    }

    pub fn next_category(&mut self) {
        let len = self.kind.categories().len();
        self.category_index = (self.category_index + 1) % len;
    }

    pub fn previous_category(&mut self) {
        let len = self.kind.categories().len();
        self.category_index = (self.category_index + len - 1) % len;
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_field(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Up-arrow / `+` on the focused field
    pub fn increment(&mut self) {
        match self.focus {
            FormField::Type => self.toggle_kind(),
            FormField::Category => self.next_category(),
            FormField::Amount => {}
            FormField::Year => self.period.increment(PeriodField::Year),
            FormField::Month => self.period.increment(PeriodField::Month),
        }
    }

    /// Down-arrow / `-` on the focused field
    pub fn decrement(&mut self) {
        match self.focus {
            FormField::Type => self.toggle_kind(),
            FormField::Category => self.previous_category(),
            FormField::Amount => {}
            FormField::Year => self.period.decrement(PeriodField::Year),
            FormField::Month => self.period.decrement(PeriodField::Month),
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == FormField::Amount {
            self.amount.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == FormField::Amount {
            self.amount.pop();
        }
    }

    /// Build the record, or fail if the amount text is not a number
    pub fn submit(&self) -> Result<Transaction, FormError> {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .map_err(|_| FormError::InvalidAmount(self.amount.clone()))?;

        Ok(Transaction::from_form(
            self.kind,
            self.category(),
            amount,
            self.period.period(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddTransactionForm {
        AddTransactionForm::new(Period::new(2024, 1).unwrap(), 2000..=2100)
    }

    #[test]
    fn test_new_form_defaults() {
        let form = form();
        assert_eq!(form.kind, TransactionType::Income);
        assert_eq!(form.category(), "Salary");
        assert_eq!(form.focus, FormField::Type);
        assert_eq!(form.period.period().key(), "2024-01");
    }

    #[test]
    fn test_toggle_kind_resets_categories() {
        let mut form = form();
        form.next_category();
        assert_eq!(form.category(), "Business");

        form.toggle_kind();
        assert_eq!(form.kind, TransactionType::Expense);
        assert_eq!(form.category(), "Food");

        form.previous_category();
        assert_eq!(form.category(), "Travel");
    }

    #[test]
    fn test_submit_builds_transaction() {
        let mut form = form();
        form.toggle_kind();
        form.next_category();
        form.focus = FormField::Amount;
        for c in "1200.50".chars() {
            form.push_char(c);
        }
        form.focus = FormField::Month;
        form.increment();

        let tx = form.submit().unwrap();
        assert_eq!(tx, Transaction::new("Expense", "Rent", 1200.5, "2024-02"));
    }

    #[test]
    fn test_submit_rejects_bad_amount() {
        let mut form = form();
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::InvalidAmount(String::new())
        );

        form.amount = "12,5".to_string();
        assert!(form.submit().is_err());
    }

    #[test]
    fn test_typing_only_edits_amount_field() {
        let mut form = form();
        form.push_char('9');
        assert!(form.amount.is_empty());

        form.focus = FormField::Amount;
        form.push_char('9');
        form.push_char('8');
        form.backspace();
        assert_eq!(form.amount, "9");
    }

    #[test]
    fn test_spinners_clamp_at_bounds() {
        let mut picker = PeriodPicker::new(Period::new(2100, 12).unwrap(), 2000..=2100);
        picker.increment(PeriodField::Year);
        picker.increment(PeriodField::Month);
        assert_eq!(picker.period().key(), "2100-12");

        let mut picker = PeriodPicker::new(Period::new(1990, 1).unwrap(), 2000..=2100);
        assert_eq!(picker.year(), 2000);
        picker.decrement(PeriodField::Month);
        assert_eq!(picker.month(), 1);
        assert_eq!(picker.period().key(), "2000-01");
    }

    #[test]
    fn test_field_cycle_wraps() {
        let mut form = form();
        for _ in 0..FormField::ALL.len() {
            form.next_field();
        }
        assert_eq!(form.focus, FormField::Type);
        form.previous_field();
        assert_eq!(form.focus, FormField::Month);
    }
}
