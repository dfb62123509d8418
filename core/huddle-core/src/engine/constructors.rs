//! Database Constructors: factory methods for creating Database instances

use crate::config::{BackendMode, HuddleConfig};
use crate::engine::Database;
use crate::engine::policy::RecordPolicy;
use crate::error::{HuddleError, HuddleResult};
use crate::storage::{InMemoryStore, JsonFileStore, RecordStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

impl Database {
    /// 데이터베이스를 열거나 생성합니다.
    ///
    /// 지정된 디렉토리에 테이블마다 `<table>.json` 파일을 두고,
    /// 누락된 등록 테이블은 빈 배열로 생성합니다.
    ///
    /// # 인자
    ///
    /// * `path` - 테이블 파일 디렉토리 경로
    ///
    /// # 예제
    ///
    /// ```rust,no_run
    /// use huddle_core::Database;
    /// use std::path::Path;
    ///
    /// # fn main() -> huddle_core::HuddleResult<()> {
    /// let db = Database::open(Path::new("./data/db"))?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(path))]
    pub fn open(path: &Path) -> HuddleResult<Self> {
        info!("Opening database at {:?}", path);
        let store = Arc::new(JsonFileStore::open(path)?);
        Self::with_store(store, RecordPolicy::default())
    }

    /// 인메모리 데이터베이스를 생성합니다 (테스트용).
    #[instrument]
    pub fn open_in_memory() -> HuddleResult<Self> {
        info!("Creating in-memory database");
        Self::with_store(Arc::new(InMemoryStore::new()), RecordPolicy::default())
    }

    /// Build on an explicit store and policy, then initialize the registry tables.
    pub fn with_store(store: Arc<dyn RecordStore>, policy: RecordPolicy) -> HuddleResult<Self> {
        let db = Self { store, policy };
        db.initialize_tables()?;
        Ok(db)
    }

    /// Open the backend described by `config`.
    ///
    /// Only the local backend is served here; a hosted configuration is
    /// reported as not implemented.
    #[instrument(skip(config))]
    pub fn from_config(config: &HuddleConfig) -> HuddleResult<Self> {
        match &config.backend {
            BackendMode::Local => Self::open(&config.data_dir),
            BackendMode::Hosted(creds) => Err(HuddleError::NotImplemented(format!(
                "hosted backend at {} is served by the production client",
                creds.url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostedCredentials;
    use crate::engine::registry::TABLES;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_every_registered_table() {
        let dir = tempdir().unwrap();
        let _db = Database::open(dir.path()).unwrap();
        for table in TABLES {
            let path = dir.path().join(format!("{table}.json"));
            assert!(path.is_file(), "missing {table}");
            assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
        }
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        {
            let db = Database::open(dir.path()).unwrap();
            db.table("users")
                .insert(json!({"email": "a@example.com"}))
                .unwrap();
        }
        let db = Database::open(dir.path()).unwrap();
        assert_eq!(db.initialize_tables().unwrap(), 0);
        assert_eq!(db.table("users").execute().unwrap().len(), 1);
    }

    #[test]
    fn test_from_config_local() {
        let dir = tempdir().unwrap();
        let config = HuddleConfig::local(dir.path().join("db"));
        let db = Database::from_config(&config).unwrap();
        assert_eq!(db.table_counts().unwrap().len(), TABLES.len());
    }

    #[test]
    fn test_from_config_hosted_not_implemented() {
        let config = HuddleConfig {
            data_dir: "unused".into(),
            backend: BackendMode::Hosted(HostedCredentials {
                url: "https://db.example.com".into(),
                key: "anon".into(),
            }),
        };
        assert!(matches!(
            Database::from_config(&config),
            Err(HuddleError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_reset_table() {
        let db = Database::open_in_memory().unwrap();
        db.table("pools").insert(json!({"pool_name": "P"})).unwrap();
        db.reset_table("pools").unwrap();
        assert!(db.table("pools").execute().unwrap().is_empty());
    }
}
