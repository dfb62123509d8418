//! JSON file store: one `<table>.json` file per table.
//!
//! Each file holds a pretty-printed JSON array of flat objects. Every load
//! reads the whole file and every save rewrites it.

use crate::error::{HuddleError, HuddleResult};
use crate::record::Record;
use crate::storage::RecordStore;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const TABLE_FILE_EXTENSION: &str = "json";

/// File-backed record store rooted at a base directory.
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store at `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl AsRef<Path>) -> HuddleResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Base directory holding the table files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the backing file for `table`.
    ///
    /// The name must be a single plain path component (`a..b` is fine,
    /// `..`, `.` or anything with a separator is not).
    pub fn table_path(&self, table: &str) -> HuddleResult<PathBuf> {
        let mut components = Path::new(table).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || table.contains('/') || table.contains('\\') {
            return Err(HuddleError::InvalidTableName(table.to_string()));
        }
        Ok(self
            .base_dir
            .join(format!("{table}.{TABLE_FILE_EXTENSION}")))
    }
}

/// Parse file contents into records; `None` means the file is corrupt.
fn parse_table(contents: &str) -> Option<Vec<Record>> {
    match serde_json::from_str::<Value>(contents).ok()? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, table: &str) -> HuddleResult<Vec<Record>> {
        let path = self.table_path(table)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(table, "table file is not valid UTF-8, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match parse_table(&contents) {
            Some(records) => {
                debug!(table, rows = records.len(), "loaded table");
                Ok(records)
            }
            None => {
                warn!(table, path = %path.display(), "corrupt table file, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, table: &str, records: &[Record]) -> HuddleResult<()> {
        let path = self.table_path(table)?;
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json)?;
        debug!(table, rows = records.len(), "saved table");
        Ok(())
    }

    fn exists(&self, table: &str) -> HuddleResult<bool> {
        Ok(self.table_path(table)?.is_file())
    }

    fn table_names(&self) -> HuddleResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TABLE_FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
