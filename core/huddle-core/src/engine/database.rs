//! Database struct definition: the client facade

use crate::api::query::TableQuery;
use crate::engine::policy::RecordPolicy;
use crate::engine::registry::TABLES;
use crate::error::HuddleResult;
use crate::storage::RecordStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Huddle 로컬 데이터베이스
///
/// 호스팅 데이터베이스 클라이언트와 같은 호출 형태(`table(..).select/eq/insert/
/// update/delete/execute`)를 제공하는 진입점입니다.
///
/// # 데이터 흐름
///
/// - **table()**: 테이블 하나에 묶인 [`TableQuery`] 생성 (저장소 접근 없음)
/// - **터미널 연산**: 테이블 전체를 읽고, 메모리에서 처리한 뒤, 필요하면 전체를 다시 씀
///
/// # 예제
///
/// ```rust
/// use huddle_core::Database;
/// use serde_json::json;
///
/// # fn main() -> huddle_core::HuddleResult<()> {
/// let db = Database::open_in_memory()?;
/// let inserted = db.table("users").insert(json!({"email": "a@example.com"}))?;
/// assert!(inserted.first().unwrap().contains_key("user_id"));
///
/// let found = db.table("users").select("*").eq("email", "a@example.com").execute()?;
/// assert_eq!(found.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Database {
    /// Whole-table record store (file-backed or in-memory)
    pub(crate) store: Arc<dyn RecordStore>,

    /// Primary key / timestamp stamping
    pub(crate) policy: RecordPolicy,
}

impl Database {
    /// 테이블에 묶인 쿼리 빌더를 반환합니다.
    ///
    /// 레지스트리에 없는 이름도 허용되며, 첫 쓰기 때 파일이 생성됩니다.
    pub fn table(&self, name: &str) -> TableQuery<'_> {
        TableQuery::new(self, name)
    }

    /// Create an empty store for every registered table that is missing.
    ///
    /// Idempotent: existing tables are never touched. Returns how many
    /// tables were created.
    pub fn initialize_tables(&self) -> HuddleResult<usize> {
        let mut created = 0;
        for table in TABLES {
            if self.store.ensure_table(table)? {
                debug!(table, "created empty table");
                created += 1;
            }
        }
        if created > 0 {
            info!("Initialized {} empty tables", created);
        }
        Ok(created)
    }

    /// Overwrite a table with an empty array.
    pub fn reset_table(&self, name: &str) -> HuddleResult<()> {
        self.store.save(name, &[])?;
        info!(table = name, "table cleared");
        Ok(())
    }

    /// Row count of every registered table, in registry order.
    pub fn table_counts(&self) -> HuddleResult<Vec<(String, usize)>> {
        TABLES
            .iter()
            .map(|table| Ok((table.to_string(), self.store.load(table)?.len())))
            .collect()
    }

    /// Underlying record store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Stamping policy in effect.
    pub fn policy(&self) -> &RecordPolicy {
        &self.policy
    }
}
