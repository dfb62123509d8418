//! Pools, participants, selections and scores.

use crate::Table;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 점수 풀
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "pools")]
pub struct Pool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    pub pool_name: String,
    #[serde(default)]
    pub pool_description: String,
    /// Owning user id
    pub created_by: String,
    pub season_year: i32,
    #[serde(default)]
    pub entry_fee: f64,
    pub max_participants: u32,
    #[serde(with = "crate::model::timestamp")]
    pub registration_deadline: NaiveDateTime,
    #[serde(default)]
    pub is_active: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl Pool {
    pub fn id(&self) -> &str {
        self.pool_id.as_deref().unwrap_or_default()
    }

    /// `"<name> (<season>)"`, the label pages list pools by.
    pub fn label(&self) -> String {
        format!("{} ({})", self.pool_name, self.season_year)
    }
}

/// 풀 참가 기록 (profile ↔ pool)
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "pool_participants")]
pub struct PoolParticipant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_participant_id: Option<String>,
    pub pool_id: String,
    pub profile_id: String,
    #[serde(default)]
    pub selections_complete: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub joined_at: Option<NaiveDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

/// 팀 선택 하나 (순서 1..=4)
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "team_selections")]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_selection_id: Option<String>,
    pub pool_id: String,
    pub profile_id: String,
    pub team_id: String,
    pub selection_order: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

/// 참가자의 주간 점수 스냅샷
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "pool_scores")]
pub struct PoolScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_score_id: Option<String>,
    pub pool_id: String,
    pub profile_id: String,
    #[serde(default)]
    pub week_id: Option<String>,
    #[serde(default)]
    pub points_earned: i64,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_position: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}
