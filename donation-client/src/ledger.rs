//! Ledger - locally persisted donation history
//!
//! Loaded once at startup, mutated only through [`Ledger::append`], and
//! written through to the store on every mutation as a full replace of the
//! serialized sequence.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::DonationRecord;

use crate::error::ClientResult;
use crate::store::KeyValueStore;

/// Storage key of the serialized ledger
pub const LEDGER_KEY: &str = "opnet_donations_v1";

/// Where an unreadable ledger value is moved aside
pub const CORRUPT_LEDGER_KEY: &str = "opnet_donations_v1.corrupt";

/// Donation ledger, most-recent-first
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    records: Vec<DonationRecord>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records.len())
            .finish()
    }
}

impl Ledger {
    /// Load the ledger from `store`.
    ///
    /// An absent value is an empty ledger. A value that does not parse is
    /// also treated as empty; the raw text is copied to
    /// [`CORRUPT_LEDGER_KEY`] first so the next write does not destroy it.
    pub fn load(store: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        let records = match store.get(LEDGER_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<DonationRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored donation ledger is unreadable, starting empty");
                    if let Err(e) = store.set(CORRUPT_LEDGER_KEY, &raw) {
                        tracing::error!(error = %e, "Failed to keep unreadable ledger aside");
                    }
                    Vec::new()
                }
            },
        };

        tracing::info!(count = records.len(), "Donation ledger loaded");
        Ok(Self { store, records })
    }

    /// Serialize the whole sequence and overwrite the stored value
    pub fn save(&self) -> ClientResult<()> {
        let content = serde_json::to_string(&self.records)?;
        self.store.set(LEDGER_KEY, &content)?;
        Ok(())
    }

    /// Prepend `record` and persist.
    ///
    /// The record stays in memory even when the write fails.
    pub fn append(&mut self, record: DonationRecord) -> ClientResult<()> {
        self.records.insert(0, record);
        self.save()
    }

    pub fn records(&self) -> &[DonationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id for the next record: strictly greater than every id in the ledger
    pub fn next_id(&self) -> i64 {
        let candidate = shared::util::snowflake_id();
        match self.records.iter().map(|r| r.id).max() {
            Some(last) if last >= candidate => last.saturating_add(1),
            _ => candidate,
        }
    }

    /// Sum of `amount` over records whose status is not `Failed`
    pub fn total_donated(&self) -> Decimal {
        shared::models::donation::total_donated(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use shared::DonationStatus;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn record(id: i64, amount: &str) -> DonationRecord {
        DonationRecord {
            id,
            name: "bob".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            message: "gm".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            tx_id: Some(format!("tx{}", id)),
            status: DonationStatus::Pending,
        }
    }

    #[test]
    fn test_load_absent_is_empty() {
        let ledger = Ledger::load(Arc::new(MemoryStore::new())).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_donated(), Decimal::ZERO);
    }

    #[test]
    fn test_append_prepends_and_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut ledger = Ledger::load(store.clone()).unwrap();

        ledger.append(record(1, "0.1")).unwrap();
        ledger.append(record(2, "0.2")).unwrap();
        assert_eq!(ledger.records()[0].id, 2);
        assert_eq!(ledger.records()[1].id, 1);

        let reloaded = Ledger::load(store).unwrap();
        assert_eq!(reloaded.records(), ledger.records());
    }

    #[test]
    fn test_save_load_is_identity() {
        let temp_dir = TempDir::new().unwrap();
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(temp_dir.path()));

        let mut ledger = Ledger::load(store.clone()).unwrap();
        ledger.append(record(1, "0.001")).unwrap();
        ledger.append(record(2, "1.5")).unwrap();
        ledger.append(record(3, "0.00000001")).unwrap();
        ledger.append(record(4, "0.123456789012345678")).unwrap();

        let reloaded = Ledger::load(store.clone()).unwrap();
        assert_eq!(reloaded.records(), ledger.records());

        // saving again produces the same stored text
        let first = store.get(LEDGER_KEY).unwrap();
        reloaded.save().unwrap();
        assert_eq!(store.get(LEDGER_KEY).unwrap(), first);
    }

    #[test]
    fn test_high_precision_amount_reloads_exactly() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let amount = Decimal::from_str("0.123456789012345678").unwrap();

        let mut ledger = Ledger::load(store.clone()).unwrap();
        let mut entry = record(1, "1");
        entry.amount = amount;
        ledger.append(entry).unwrap();

        // still a JSON number, digit for digit
        let raw = store.get(LEDGER_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""amount":0.123456789012345678"#));

        let reloaded = Ledger::load(store).unwrap();
        assert_eq!(reloaded.records()[0].amount, amount);
        assert_eq!(reloaded.records()[0].amount.to_string(), "0.123456789012345678");
    }

    #[test]
    fn test_corrupt_value_loads_empty_and_is_kept_aside() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(LEDGER_KEY, "{not json").unwrap();

        let ledger = Ledger::load(store.clone()).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(
            store.get(CORRUPT_LEDGER_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    /// Returns an unreadable ledger and refuses every write
    struct CorruptReadOnlyStore;

    impl KeyValueStore for CorruptReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, crate::store::StoreError> {
            Ok(Some("[{".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), crate::store::StoreError> {
            Err(crate::store::StoreError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&self, _key: &str) -> Result<(), crate::store::StoreError> {
            Ok(())
        }
    }

    #[test]
    fn test_corrupt_value_loads_empty_even_if_copy_fails() {
        let ledger = Ledger::load(Arc::new(CorruptReadOnlyStore)).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_next_id_after_max_id_does_not_overflow() {
        let mut ledger = Ledger::load(Arc::new(MemoryStore::new())).unwrap();
        ledger.append(record(i64::MAX, "1")).unwrap();
        assert_eq!(ledger.next_id(), i64::MAX);
    }

    #[test]
    fn test_next_id_is_strictly_increasing() {
        let mut ledger = Ledger::load(Arc::new(MemoryStore::new())).unwrap();
        // id far in the future forces the +1 path
        ledger.append(record(i64::MAX / 2, "1")).unwrap();
        assert_eq!(ledger.next_id(), i64::MAX / 2 + 1);

        let mut ledger = Ledger::load(Arc::new(MemoryStore::new())).unwrap();
        let a = ledger.next_id();
        ledger.append(record(a, "1")).unwrap();
        let b = ledger.next_id();
        assert!(b > a);
    }
}
