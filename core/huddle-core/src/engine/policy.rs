//! Identifier & Timestamp Policy
//!
//! 테이블 이름에서 기본 키 필드 이름을 유도하고, 삽입/수정 시각을 기록합니다.
//!
//! 키 이름 규칙은 기존 데이터와의 호환을 위해 정확히 유지해야 합니다.
//! 페이지들이 `team_id` 같은 필드 이름으로 테이블 간 조인을 하기 때문입니다.

use crate::record::Record;
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Creation timestamp field stamped on insert.
pub const CREATED_AT: &str = "created_at";
/// Update timestamp field stamped on update.
pub const UPDATED_AT: &str = "updated_at";

/// ISO-8601 with microseconds, no offset (local wall clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// 불규칙 테이블의 기본 키 필드
const KEY_OVERRIDES: [(&str, &str); 4] = [
    ("nfl_teams", "team_id"),
    ("nfl_seasons", "season_id"),
    ("nfl_weeks", "week_id"),
    ("nfl_games", "game_id"),
];

/// Primary-key field name for `table`.
///
/// Irregular tables use an override; every other name drops its final
/// character and appends `_id` (`users` → `user_id`,
/// `team_performance` → `team_performanc_id`).
pub fn primary_key_field(table: &str) -> String {
    if let Some((_, field)) = KEY_OVERRIDES.iter().find(|(name, _)| *name == table) {
        return (*field).to_string();
    }
    let mut stem = table.to_string();
    stem.pop();
    format!("{stem}_id")
}

/// Format a timestamp the way records store it.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ════════════════════════════════════════════
// Clock
// ════════════════════════════════════════════

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at one instant (tests, reproducible seeds).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ════════════════════════════════════════════
// Identifier generation
// ════════════════════════════════════════════

/// Source of fresh primary-key values.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, table: &str) -> String;
}

/// Random UUID v4 strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self, _table: &str) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `"<prefix>-<n>"` ids, counting from 1.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, _table: &str) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

// ════════════════════════════════════════════
// RecordPolicy
// ════════════════════════════════════════════

/// Clock + id generator applied by the query builder on mutation.
#[derive(Clone)]
pub struct RecordPolicy {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl RecordPolicy {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the id generator.
    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Current time from the policy clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Current time, formatted for storage.
    pub fn timestamp(&self) -> String {
        format_timestamp(self.clock.now())
    }

    /// Fill in the primary key and `created_at` when absent.
    pub fn stamp_insert(&self, table: &str, record: &mut Record) {
        let key_field = primary_key_field(table);
        if !record.contains_key(&key_field) {
            record.insert(key_field, Value::String(self.ids.next_id(table)));
        }
        if !record.contains_key(CREATED_AT) {
            record.insert(CREATED_AT.to_string(), Value::String(self.timestamp()));
        }
    }

    /// Stamp `updated_at` with the current time.
    pub fn stamp_update(&self, _table: &str, record: &mut Record) {
        record.insert(UPDATED_AT.to_string(), Value::String(self.timestamp()));
    }

    /// Merge `patch` into `record` and stamp `updated_at`.
    ///
    /// The primary key never changes; a patch carrying it is ignored for
    /// that field.
    pub fn apply_update(&self, table: &str, record: &mut Record, patch: &Record) {
        let key_field = primary_key_field(table);
        for (field, value) in patch {
            if *field == key_field {
                warn!(table, field = %key_field, "ignoring primary key in update payload");
                continue;
            }
            record.insert(field.clone(), value.clone());
        }
        self.stamp_update(table, record);
    }
}

impl Default for RecordPolicy {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 7)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 250)
            .unwrap()
    }

    #[test]
    fn test_primary_key_overrides() {
        assert_eq!(primary_key_field("nfl_teams"), "team_id");
        assert_eq!(primary_key_field("nfl_seasons"), "season_id");
        assert_eq!(primary_key_field("nfl_weeks"), "week_id");
        assert_eq!(primary_key_field("nfl_games"), "game_id");
    }

    #[test]
    fn test_primary_key_default_rule() {
        assert_eq!(primary_key_field("users"), "user_id");
        assert_eq!(primary_key_field("pools"), "pool_id");
        assert_eq!(primary_key_field("profiles"), "profile_id");
        assert_eq!(primary_key_field("pool_participants"), "pool_participant_id");
        assert_eq!(primary_key_field("team_selections"), "team_selection_id");
        assert_eq!(primary_key_field("pool_scores"), "pool_score_id");
        // 마지막 글자를 무조건 제거 (기존 데이터 호환)
        assert_eq!(primary_key_field("team_performance"), "team_performanc_id");
        assert_eq!(primary_key_field(""), "_id");
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(fixed()), "2024-09-07T12:30:00.000250");
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("row");
        assert_eq!(ids.next_id("users"), "row-1");
        assert_eq!(ids.next_id("pools"), "row-2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidGenerator;
        let a = ids.next_id("users");
        let b = ids.next_id("users");
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_stamp_insert_fills_missing_fields_only() {
        let policy = RecordPolicy::new(Arc::new(FixedClock(fixed())), Arc::new(SequentialIds::new("u")));

        let mut fresh = json!({"email": "a@example.com"}).as_object().cloned().unwrap();
        policy.stamp_insert("users", &mut fresh);
        assert_eq!(fresh.get("user_id"), Some(&json!("u-1")));
        assert_eq!(fresh.get("created_at"), Some(&json!("2024-09-07T12:30:00.000250")));

        let mut explicit = json!({"user_id": "mine", "created_at": "then"})
            .as_object()
            .cloned()
            .unwrap();
        policy.stamp_insert("users", &mut explicit);
        assert_eq!(explicit.get("user_id"), Some(&json!("mine")));
        assert_eq!(explicit.get("created_at"), Some(&json!("then")));
    }

    #[test]
    fn test_apply_update_keeps_primary_key() {
        let policy = RecordPolicy::default().with_clock(Arc::new(FixedClock(fixed())));

        let mut row = json!({"pool_id": "p1", "pool_name": "Old"})
            .as_object()
            .cloned()
            .unwrap();
        let patch = json!({"pool_id": "hijack", "pool_name": "New"})
            .as_object()
            .cloned()
            .unwrap();
        policy.apply_update("pools", &mut row, &patch);

        assert_eq!(row.get("pool_id"), Some(&json!("p1")));
        assert_eq!(row.get("pool_name"), Some(&json!("New")));
        assert_eq!(row.get("updated_at"), Some(&json!("2024-09-07T12:30:00.000250")));
    }
}
