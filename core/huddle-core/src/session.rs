//! Session context: explicit per-session state.
//!
//! 세션이 시작될 때 생성되고, 로그인 시 채워지며, 로그아웃 시 `clear()`로
//! 모든 필드가 초기화됩니다.

use crate::error::{HuddleError, HuddleResult};
use crate::model::Profile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub current_profile: Option<Profile>,
    pub user_email: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logout: reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.user_id.is_some()
    }

    /// Logged-in user id.
    pub fn require_user(&self) -> HuddleResult<&str> {
        match (&self.user_id, self.authenticated) {
            (Some(id), true) => Ok(id),
            _ => Err(HuddleError::Unauthenticated("login required".into())),
        }
    }

    /// Active profile of the logged-in user.
    pub fn require_profile(&self) -> HuddleResult<&Profile> {
        self.require_user()?;
        self.current_profile.as_ref().ok_or_else(|| {
            HuddleError::Unauthenticated("select or create a profile first".into())
        })
    }
}
