//! Query Builder: Fluent 스타일 API
//!
//! 호스팅 클라이언트와 같은 호출 형태를 제공합니다:
//!
//! ```text
//! db.table("pools").select("*").eq("is_active", true).limit(10).execute()
//! ```
//!
//! 빌더 메서드(`select`, `eq`, `limit`)는 저장소에 접근하지 않습니다.
//! 터미널 연산(`execute`, `insert`, `update`, `delete`)은 매번 테이블 전체를
//! 다시 읽고, 메모리에서 처리한 뒤, 필요하면 전체를 다시 씁니다.

use crate::api::result::QueryResult;
use crate::api::traits::TableRow;
use crate::engine::Database;
use crate::error::HuddleResult;
use crate::record::{IntoRecords, Record, project, to_record, values_equal};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// 등치 조건 하나
#[derive(Debug, Clone)]
struct Predicate {
    field: String,
    expected: Value,
}

impl Predicate {
    /// Absent fields never match.
    fn matches(&self, record: &Record) -> bool {
        record
            .get(&self.field)
            .is_some_and(|actual| values_equal(actual, &self.expected))
    }
}

/// Query Builder: 테이블 하나에 묶인 일회성 쿼리
#[must_use = "a query does nothing until a terminal operation is called"]
pub struct TableQuery<'a> {
    db: &'a Database,
    table: String,
    predicates: Vec<Predicate>,
    columns: Option<Vec<String>>,
    limit: Option<usize>,
}

impl<'a> TableQuery<'a> {
    pub fn new(db: &'a Database, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
            predicates: Vec::new(),
            columns: None,
            limit: None,
        }
    }

    /// Table this query is bound to.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// 컬럼 선택: `"*"`는 전체, 그 외는 쉼표로 구분된 이름 목록
    pub fn select(mut self, columns: &str) -> Self {
        let columns = columns.trim();
        self.columns = if columns.is_empty() || columns == "*" {
            None
        } else {
            Some(
                columns
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        };
        self
    }

    /// 등치 조건 추가 (여러 번 호출하면 AND)
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate {
            field: field.to_string(),
            expected: value.into(),
        });
        self
    }

    /// `execute`가 반환할 최대 행 수
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    // ════════════════════════════════════════════
    // Terminal operations
    // ════════════════════════════════════════════

    /// 조건에 맞는 레코드를 저장 순서대로 반환
    pub fn execute(self) -> HuddleResult<QueryResult> {
        let rows = self.db.store.load(&self.table)?;
        let limit = self.limit.unwrap_or(usize::MAX);

        let data: Vec<Record> = rows
            .iter()
            .filter(|r| self.matches(r))
            .take(limit)
            .map(|r| match &self.columns {
                Some(columns) => project(r, columns),
                None => r.clone(),
            })
            .collect();

        debug!(table = %self.table, scanned = rows.len(), returned = data.len(), "execute");
        Ok(QueryResult::new(data))
    }

    /// 레코드 삽입: 기본 키와 `created_at`이 없으면 채움
    ///
    /// 여러 행도 한 번의 저장으로 기록됩니다. 중복 키는 검사하지 않습니다.
    pub fn insert(self, rows: impl IntoRecords) -> HuddleResult<QueryResult> {
        let mut inserted = rows.into_records()?;
        for record in &mut inserted {
            self.db.policy.stamp_insert(&self.table, record);
        }

        let mut table = self.db.store.load(&self.table)?;
        table.extend(inserted.iter().cloned());
        self.db.store.save(&self.table, &table)?;

        debug!(table = %self.table, inserted = inserted.len(), total = table.len(), "insert");
        Ok(QueryResult::new(inserted))
    }

    /// 조건에 맞는 모든 레코드에 patch를 병합하고 `updated_at` 기록
    ///
    /// 기본 키는 변경되지 않습니다.
    pub fn update(self, patch: Record) -> HuddleResult<QueryResult> {
        let mut table = self.db.store.load(&self.table)?;
        let mut updated = Vec::new();

        for record in table.iter_mut() {
            if self.matches(record) {
                self.db.policy.apply_update(&self.table, record, &patch);
                updated.push(record.clone());
            }
        }

        self.db.store.save(&self.table, &table)?;
        debug!(table = %self.table, updated = updated.len(), total = table.len(), "update");
        Ok(QueryResult::new(updated))
    }

    /// 조건에 맞는 레코드를 제거하고 제거된 레코드를 반환
    pub fn delete(self) -> HuddleResult<QueryResult> {
        let table = self.db.store.load(&self.table)?;
        let (deleted, remaining): (Vec<Record>, Vec<Record>) =
            table.into_iter().partition(|r| self.matches(r));

        self.db.store.save(&self.table, &remaining)?;
        debug!(table = %self.table, deleted = deleted.len(), remaining = remaining.len(), "delete");
        Ok(QueryResult::new(deleted))
    }

    // ════════════════════════════════════════════
    // Typed helpers
    // ════════════════════════════════════════════

    /// Insert one typed row.
    pub fn insert_row<T: Serialize>(self, row: &T) -> HuddleResult<QueryResult> {
        let record = to_record(row)?;
        self.insert(record)
    }

    /// Insert several typed rows with a single save.
    pub fn insert_rows<T: Serialize>(self, rows: &[T]) -> HuddleResult<QueryResult> {
        let records = rows.iter().map(to_record).collect::<HuddleResult<Vec<_>>>()?;
        self.insert(records)
    }

    /// Update with any serializable patch (struct or map).
    pub fn update_with<P: Serialize + ?Sized>(self, patch: &P) -> HuddleResult<QueryResult> {
        let patch = to_record(patch)?;
        self.update(patch)
    }
}

impl Database {
    /// Query builder for the table behind `T`.
    pub fn table_for<T: TableRow>(&self) -> TableQuery<'_> {
        TableQuery::new(self, T::TABLE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::policy::{FixedClock, RecordPolicy, SequentialIds};
    use crate::error::HuddleError;
    use crate::storage::InMemoryStore;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;

    fn db() -> Database {
        let now = NaiveDate::from_ymd_opt(2024, 9, 7)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let policy = RecordPolicy::new(Arc::new(FixedClock(now)), Arc::new(SequentialIds::new("id")));
        Database::with_store(Arc::new(InMemoryStore::new()), policy).unwrap()
    }

    fn seed_users(db: &Database) {
        db.table("users")
            .insert(json!([
                {"email": "a@example.com", "age": 30, "role": "admin"},
                {"email": "b@example.com", "age": 25},
                {"email": "c@example.com", "age": 30.0, "role": "member"},
            ]))
            .unwrap();
    }

    #[test]
    fn test_select_parses_column_list() {
        let db = db();
        let q = db.table("users").select(" email , age ");
        assert_eq!(q.columns, Some(vec!["email".to_string(), "age".to_string()]));
        let q = db.table("users").select("*");
        assert!(q.columns.is_none());
    }

    #[test]
    fn test_insert_stamps_key_and_created_at() {
        let db = db();
        let result = db.table("users").insert(json!({"email": "a@example.com"})).unwrap();
        let row = result.first().unwrap();
        assert_eq!(row["user_id"], json!("id-1"));
        assert_eq!(row["created_at"], json!("2024-09-07T09:00:00.000000"));
        // 필드 순서: 입력 필드 → 기본 키 → created_at
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, ["email", "user_id", "created_at"]);
    }

    #[test]
    fn test_insert_keeps_explicit_key() {
        let db = db();
        let result = db
            .table("nfl_teams")
            .insert(json!({"team_id": "kc", "team_code": "KC"}))
            .unwrap();
        assert_eq!(result.first().unwrap()["team_id"], json!("kc"));
    }

    #[test]
    fn test_insert_rejects_scalar_payload() {
        let db = db();
        assert!(matches!(
            db.table("users").insert(json!("nope")),
            Err(HuddleError::InvalidArguments(_))
        ));
        assert!(db.table("users").execute().unwrap().is_empty());
    }

    #[test]
    fn test_execute_filters_and_projects() {
        let db = db();
        seed_users(&db);

        let found = db.table("users").select("email,role").eq("age", 30).execute().unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found.data[0], json!({"email": "a@example.com", "role": "admin"}).as_object().cloned().unwrap());
        assert_eq!(found.data[1]["email"], json!("c@example.com"));

        // 없는 필드는 null로 채우지 않음
        let b = db.table("users").select("role,email").eq("email", "b@example.com").execute().unwrap();
        assert_eq!(b.data[0].len(), 1);
        assert!(!b.data[0].contains_key("role"));
    }

    #[test]
    fn test_absent_field_never_matches() {
        let db = db();
        seed_users(&db);
        let found = db.table("users").eq("role", Value::Null).execute().unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_predicates_are_anded() {
        let db = db();
        seed_users(&db);
        let found = db
            .table("users")
            .eq("age", 30)
            .eq("role", "member")
            .execute()
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.data[0]["email"], json!("c@example.com"));
    }

    #[test]
    fn test_limit_caps_rows() {
        let db = db();
        seed_users(&db);
        let found = db.table("users").limit(2).execute().unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found.data[1]["email"], json!("b@example.com"));
        assert!(db.table("users").limit(0).execute().unwrap().is_empty());
    }

    #[test]
    fn test_update_scopes_to_matches() {
        let db = db();
        seed_users(&db);

        let updated = db
            .table("users")
            .eq("age", 30)
            .update(json!({"age": 31, "user_id": "hijack"}).as_object().cloned().unwrap())
            .unwrap();
        assert_eq!(updated.len(), 2);

        let all = db.table("users").execute().unwrap();
        assert_eq!(all.data[0]["age"], json!(31));
        assert_eq!(all.data[0]["user_id"], json!("id-1"));
        assert!(all.data[0].contains_key("updated_at"));
        assert_eq!(all.data[1]["age"], json!(25));
        assert!(!all.data[1].contains_key("updated_at"));
    }

    #[test]
    fn test_update_without_matches_leaves_table() {
        let db = db();
        seed_users(&db);
        let before = db.table("users").execute().unwrap().into_data();
        let updated = db.table("users").eq("email", "z@example.com").update_with(&json!({"age": 1})).unwrap();
        assert!(updated.is_empty());
        assert_eq!(db.table("users").execute().unwrap().into_data(), before);
    }

    #[test]
    fn test_delete_returns_removed() {
        let db = db();
        seed_users(&db);

        let deleted = db.table("users").eq("age", 30).delete().unwrap();
        assert_eq!(deleted.len(), 2);

        let remaining = db.table("users").execute().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.data[0]["email"], json!("b@example.com"));
    }

    #[test]
    fn test_delete_without_predicates_clears_table() {
        let db = db();
        seed_users(&db);
        assert_eq!(db.table("users").delete().unwrap().len(), 3);
        assert!(db.table("users").execute().unwrap().is_empty());
    }

    #[test]
    fn test_typed_insert_and_update() {
        #[derive(Serialize)]
        struct NewPool<'a> {
            pool_name: &'a str,
            is_active: bool,
        }
        #[derive(Serialize)]
        struct Deactivate {
            is_active: bool,
        }

        let db = db();
        let inserted = db
            .table("pools")
            .insert_rows(&[
                NewPool { pool_name: "A", is_active: true },
                NewPool { pool_name: "B", is_active: true },
            ])
            .unwrap();
        assert_eq!(inserted.len(), 2);

        db.table("pools")
            .eq("pool_name", "B")
            .update_with(&Deactivate { is_active: false })
            .unwrap();
        let active = db.table("pools").eq("is_active", true).execute().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active.data[0]["pool_id"], json!("id-1"));
    }

    #[test]
    fn test_unsafe_table_name_is_rejected_by_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        assert!(matches!(
            db.table("../escape").execute(),
            Err(HuddleError::InvalidTableName(_))
        ));
    }
}
