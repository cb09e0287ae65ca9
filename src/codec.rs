// Flat-file codec
// One record per line: type,category,amount,date (no header, no escaping)

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::store::RecordStore;
use crate::transaction::Transaction;

/// Number of comma-separated fields in a record line
pub const FIELD_COUNT: usize = 4;

const SEPARATOR: char = ',';

/// Why a single line could not be turned into a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 4 fields, found {found}")]
    FieldCount { found: usize },
    #[error("invalid amount: {value:?}")]
    InvalidAmount { value: String },
}

/// Records decoded from a block of text, plus how many lines were dropped
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadOutcome {
    pub records: Vec<Transaction>,
    pub skipped: usize,
}

/// Result of loading a file into a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

// ============================================================================
// LINE LEVEL
// ============================================================================

/// Amounts keep a decimal point even when integral (`3000.0`), and otherwise
/// use the shortest representation that parses back to the same value.
pub fn format_amount(amount: f64) -> String {
    format!("{:?}", amount)
}

pub fn serialize(record: &Transaction) -> String {
    format!(
        "{}{sep}{}{sep}{}{sep}{}",
        record.kind,
        record.category,
        format_amount(record.amount),
        record.date,
        sep = SEPARATOR
    )
}

/// Parse one line into a record.
///
/// The line is split on every comma and trailing empty fields are dropped
/// before counting, so `a,b,1,2024-01,` still parses. Fields are taken
/// positionally; only the amount is trimmed.
pub fn parse_line(line: &str) -> Result<Transaction, ParseError> {
    let mut fields: Vec<&str> = line.split(SEPARATOR).collect();
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }

    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            found: fields.len(),
        });
    }

    let amount = fields[2]
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidAmount {
            value: fields[2].to_string(),
        })?;

    Ok(Transaction::new(fields[0], fields[1], amount, fields[3]))
}

// ============================================================================
// TEXT LEVEL
// ============================================================================

/// Decode every line of `text`, keeping good records in order and counting
/// the rest.
pub fn decode(text: &str) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                tracing::debug!(line_number = index + 1, "Skipping line: {err}");
                outcome.skipped += 1;
            }
        }
    }

    outcome
}

/// Serialize records in order, one per `\n`-terminated line
pub fn encode<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&serialize(record));
        out.push('\n');
    }
    out
}

// ============================================================================
// FILE LEVEL
// ============================================================================

/// Append every parseable record in `path` to `store`.
///
/// Only I/O failures are errors; malformed lines are counted in the report.
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the load.
pub fn load_file(store: &mut RecordStore, path: &Path) -> Result<LoadReport> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let outcome = decode(&text);
    let report = LoadReport {
        loaded: outcome.records.len(),
        skipped: outcome.skipped,
    };
    store.extend(outcome.records);

    tracing::info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "Loaded transactions"
    );

    Ok(report)
}

/// Write the whole store to `path`, replacing any existing file.
/// Returns the number of records written.
pub fn save_file(store: &RecordStore, path: &Path) -> Result<usize> {
    fs::write(path, encode(store))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), count = store.len(), "Saved transactions");

    Ok(store.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("expense-tracker-{}-{}.txt", name, uuid::Uuid::new_v4()))
    }

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add(Transaction::new("Income", "Salary", 3000.0, "2024-01"));
        store.add(Transaction::new("Expense", "Rent", 1200.0, "2024-01"));
        store.add(Transaction::new("Expense", "Food", 50.0, "2024-02"));
        store
    }

    #[test]
    fn test_serialize_joins_fields() {
        let tx = Transaction::new("Income", "Salary", 3000.0, "2024-01");
        assert_eq!(serialize(&tx), "Income,Salary,3000.0,2024-01");

        let tx = Transaction::new("Expense", "Food", 12.75, "2024-02");
        assert_eq!(serialize(&tx), "Expense,Food,12.75,2024-02");
    }

    #[test]
    fn test_round_trip() {
        let records = [
            Transaction::new("Income", "Business", 0.1, "2024-12"),
            Transaction::new("Expense", "Travel", -45.99, "2023-07"),
            Transaction::new("Expense", "Rent", 1e20, "2000-01"),
        ];

        for tx in &records {
            assert_eq!(parse_line(&serialize(tx)).unwrap(), *tx);
        }
    }

    #[test]
    fn test_non_numeric_amount_is_rejected() {
        let err = parse_line("Income,Salary,abc,2024-01").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidAmount {
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        assert_eq!(
            parse_line("Income,Salary,2024-01").unwrap_err(),
            ParseError::FieldCount { found: 3 }
        );
        assert_eq!(
            parse_line("Income,Salary,1.0,2024-01,extra").unwrap_err(),
            ParseError::FieldCount { found: 5 }
        );
        assert_eq!(parse_line("").unwrap_err(), ParseError::FieldCount { found: 0 });
    }

    #[test]
    fn test_trailing_empty_fields_are_ignored() {
        let tx = parse_line("Income,Salary,10,2024-01,,").unwrap();
        assert_eq!(tx, Transaction::new("Income", "Salary", 10.0, "2024-01"));
    }

    #[test]
    fn test_amount_whitespace_is_trimmed() {
        let tx = parse_line("Expense,Food, 7.5 ,2024-01").unwrap();
        assert_eq!(tx.amount, 7.5);
    }

    #[test]
    fn test_comma_in_category_does_not_round_trip() {
        let tx = Transaction::new("Expense", "Food, drinks", 20.0, "2024-01");
        let line = serialize(&tx);

        assert_eq!(line, "Expense,Food, drinks,20.0,2024-01");
        assert_eq!(parse_line(&line).unwrap_err(), ParseError::FieldCount { found: 5 });

        let outcome = decode(&encode([&tx]));
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_decode_counts_skipped_lines() {
        let text = "Income,Salary,3000.0,2024-01\n\
                    Income,Salary,abc,2024-01\n\
                    \n\
                    Income,Salary,2024-01\n\
                    Expense,Rent,1200,2024-01\n";
        let outcome = decode(text);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.records[1].category, "Rent");
    }

    #[test]
    fn test_decode_handles_crlf_and_missing_final_newline() {
        let outcome = decode("Income,Salary,1.0,2024-01\r\nExpense,Food,2.0,2024-01");
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].date, "2024-01");
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = sample_store();
        let path = temp_path("roundtrip");

        let written = save_file(&store, &path).unwrap();
        assert_eq!(written, 3);

        let mut loaded = RecordStore::new();
        let report = load_file(&mut loaded, &path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        assert_eq!(loaded.as_slice(), store.as_slice());
    }

    #[test]
    fn test_save_is_idempotent_and_overwrites() {
        let store = sample_store();
        let path = temp_path("idempotent");

        fs::write(&path, "stale content that is much longer than anything we write ".repeat(20)).unwrap();
        save_file(&store, &path).unwrap();
        let first = fs::read(&path).unwrap();
        save_file(&store, &path).unwrap();
        let second = fs::read(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(first, second);
        assert_eq!(first, encode(&store).into_bytes());
    }

    #[test]
    fn test_load_is_additive() {
        let path = temp_path("additive");
        fs::write(&path, "Expense,Food,50.0,2024-02\n").unwrap();

        let mut store = sample_store();
        load_file(&mut store, &path).unwrap();
        load_file(&mut store, &path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(store.len(), 5);
        assert_eq!(store.get(0).unwrap().category, "Salary");
        assert_eq!(store.get(4).unwrap().category, "Food");
    }

    #[test]
    fn test_load_skips_malformed_without_failing() {
        let path = temp_path("malformed");
        fs::write(&path, "Income,Salary,abc,2024-01\nIncome,Salary,2024-01\n").unwrap();

        let mut store = RecordStore::new();
        let report = load_file(&mut store, &path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(report, LoadReport { loaded: 0, skipped: 2 });
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_tolerates_invalid_utf8() {
        let path = temp_path("latin1");
        fs::write(&path, b"Income,Salary,3000.0,2024-01\nExpense,Caf\xe9,5.0,2024-01\n").unwrap();

        let mut store = RecordStore::new();
        let report = load_file(&mut store, &path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
        assert_eq!(store.get(0).unwrap().category, "Salary");
        assert_eq!(store.get(1).unwrap().category, "Caf\u{FFFD}");
        assert_eq!(store.get(1).unwrap().amount, 5.0);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut store = RecordStore::new();
        let result = load_file(&mut store, &temp_path("missing"));

        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = temp_path("no-such-dir");
        let result = save_file(&sample_store(), &dir.join("out.txt"));
        assert!(result.is_err());
    }
}
