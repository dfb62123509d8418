//! NFL reference data: teams, seasons, weeks, games, team performance.

use crate::Table;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points a team is worth when none is recorded.
pub const DEFAULT_TEAM_POINTS: i64 = 5;

fn default_points() -> i64 {
    DEFAULT_TEAM_POINTS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::Afc => write!(f, "AFC"),
            Conference::Nfc => write!(f, "NFC"),
        }
    }
}

/// NFL 팀
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "nfl_teams")]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub team_code: String,
    pub team_name: String,
    pub team_city: String,
    pub conference: Conference,
    pub division: String,
    #[serde(default = "default_points")]
    pub points: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl Team {
    pub fn id(&self) -> &str {
        self.team_id.as_deref().unwrap_or_default()
    }

    /// `"<city> <name>"`, e.g. `Kansas City Chiefs`.
    pub fn label(&self) -> String {
        format!("{} {}", self.team_city, self.team_name)
    }
}

/// NFL 시즌
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "nfl_seasons")]
pub struct Season {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_id: Option<String>,
    pub season_year: i32,
    pub regular_season_weeks: u32,
    #[serde(default)]
    pub is_current: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

/// 시즌 주차
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "nfl_weeks")]
pub struct Week {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_id: Option<String>,
    pub season_id: String,
    pub week_number: u32,
    pub week_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    Scheduled,
    Completed,
}

/// 경기 일정/결과 (팀은 코드로 참조)
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "nfl_games")]
pub struct Game {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub season: i32,
    pub week: u32,
    pub game_date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub game_status: GameStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

/// 팀 시즌 성적
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "team_performance")]
pub struct TeamPerformance {
    // 기존 데이터의 키 이름을 그대로 사용
    #[serde(
        rename = "team_performanc_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub performance_id: Option<String>,
    pub team_id: String,
    pub season_id: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    pub win_percentage: f64,
    pub playoff_made: bool,
    pub performance_score: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}
