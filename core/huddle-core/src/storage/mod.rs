//! Storage module: whole-table record stores.
//!
//! All stores implement the [`RecordStore`] trait.
//! The query layer depends only on this trait (Dependency Inversion Principle).

pub mod json_file;
pub mod memory;

use crate::error::HuddleResult;
use crate::record::Record;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

/// Core storage interface: every backend implements this trait.
///
/// # Contract
///
/// - `load`: Returns the whole table in storage order. A missing or corrupt
///   table reads as empty, never errors. Other I/O failures propagate.
/// - `save`: Replaces the whole table. Not atomic, no locking.
/// - `exists`: Whether the table has a backing store yet.
/// - `table_names`: All tables with a backing store.
/// - `ensure_table`: Creates an empty table if absent; returns `true` when created.
pub trait RecordStore: Send + Sync {
    /// Load every record of a table.
    fn load(&self, table: &str) -> HuddleResult<Vec<Record>>;

    /// Overwrite a table with `records`.
    fn save(&self, table: &str, records: &[Record]) -> HuddleResult<()>;

    /// Whether `table` has a backing store.
    fn exists(&self, table: &str) -> HuddleResult<bool>;

    /// Return all table names managed by this store.
    fn table_names(&self) -> HuddleResult<Vec<String>>;

    /// Create an empty table if it does not exist yet.
    ///
    /// Default implementation checks `exists` and saves an empty array.
    fn ensure_table(&self, table: &str) -> HuddleResult<bool> {
        if self.exists(table)? {
            return Ok(false);
        }
        self.save(table, &[])?;
        Ok(true)
    }
}
