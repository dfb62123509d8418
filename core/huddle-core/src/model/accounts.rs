//! Users and profiles.

use crate::Table;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 로그인 계정
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "users")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub updated_at: Option<NaiveDateTime>,
}

impl User {
    /// `"<first> <last>"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Stored id, or `""` for a row that was never inserted.
    pub fn id(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }
}

/// 계정 하나에 속한 이름 있는 프로필 (풀 참가 단위)
#[derive(Table, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[huddle(table_name = "profiles")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub user_id: String,
    pub profile_name: String,
    pub display_name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::timestamp::option"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl Profile {
    pub fn new(
        user_id: impl Into<String>,
        profile_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            profile_id: None,
            user_id: user_id.into(),
            profile_name: profile_name.into(),
            display_name: display_name.into(),
            created_at: None,
        }
    }

    pub fn id(&self) -> &str {
        self.profile_id.as_deref().unwrap_or_default()
    }
}
