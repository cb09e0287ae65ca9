use crate::transaction::Transaction;

/// In-memory, append-only sequence of transactions.
///
/// Insertion order is preserved and is the order used when saving. There is
/// no lookup by key and no way to remove or edit a record.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Transaction>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: Transaction) {
        self.records.push(record);
    }

    /// Append a batch in the order given (file load is additive)
    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Transaction>,
    {
        self.records.extend(records);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_to_end() {
        let mut store = RecordStore::new();
        store.add(Transaction::new("Income", "Salary", 3000.0, "2024-01"));
        let before = store.len();

        let tx = Transaction::new("Expense", "Rent", 1200.0, "2024-01");
        store.add(tx.clone());

        assert_eq!(store.len(), before + 1);
        assert_eq!(store.iter().last(), Some(&tx));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = RecordStore::new();
        let tx = Transaction::new("Expense", "Food", 50.0, "2024-02");
        store.add(tx.clone());
        store.add(tx.clone());

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0), store.get(1));
    }

    #[test]
    fn test_extend_preserves_order_after_existing() {
        let mut store = RecordStore::new();
        store.add(Transaction::new("Income", "Salary", 1.0, "2024-01"));
        store.extend(vec![
            Transaction::new("Expense", "Food", 2.0, "2024-01"),
            Transaction::new("Expense", "Rent", 3.0, "2024-01"),
        ]);

        let amounts: Vec<f64> = store.iter().map(|tx| tx.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
    }
}
