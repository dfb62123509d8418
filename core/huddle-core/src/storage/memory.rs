//! In-memory record store using a HashMap of tables
//!
//! Same whole-table contract as the file store, without touching disk.

use crate::error::HuddleResult;
use crate::record::Record;
use crate::storage::RecordStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory record store
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self, table: &str) -> HuddleResult<Vec<Record>> {
        let tables = self.tables.read();
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    fn save(&self, table: &str, records: &[Record]) -> HuddleResult<()> {
        let mut tables = self.tables.write();
        tables.insert(table.to_string(), records.to_vec());
        Ok(())
    }

    fn exists(&self, table: &str) -> HuddleResult<bool> {
        Ok(self.tables.read().contains_key(table))
    }

    fn table_names(&self) -> HuddleResult<Vec<String>> {
        let tables = self.tables.read();
        let mut names: Vec<String> = tables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
