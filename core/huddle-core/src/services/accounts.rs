//! Accounts: password hashing, sign-up, login, profiles.

use crate::engine::Database;
use crate::error::{HuddleError, HuddleResult};
use crate::model::{Profile, User};
use crate::session::SessionContext;
use bcrypt::{HashParts, Version};
use tracing::{debug, info, warn};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// bcrypt work factor for new hashes.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Stored hashes above this work factor are refused instead of verified.
pub const MAX_VERIFY_COST: u32 = 16;

// ════════════════════════════════════════════
// Password hashing
// ════════════════════════════════════════════

/// Hash a password with bcrypt and a fresh salt, as a `$2b$` string.
pub fn hash_password(password: &str) -> HuddleResult<String> {
    hash_password_with_cost(password, HASH_COST)
}

/// [`hash_password`] with an explicit work factor (4..=31).
pub fn hash_password_with_cost(password: &str, cost: u32) -> HuddleResult<String> {
    let parts = bcrypt::hash_with_result(password, cost)?;
    Ok(parts.format_for_version(Version::TwoB))
}

/// Check `password` against a stored bcrypt hash (`$2a$`, `$2b$`, `$2y$`).
///
/// Malformed hashes, and hashes costlier than [`MAX_VERIFY_COST`], never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.parse::<HashParts>() {
        Ok(parts) if parts.get_cost() <= MAX_VERIFY_COST => {}
        Ok(parts) => {
            warn!(cost = parts.get_cost(), "password hash cost above limit");
            return false;
        }
        Err(_) => return false,
    }
    match bcrypt::verify(password, stored) {
        Ok(matched) => matched,
        Err(e) => {
            debug!(error = %e, "unreadable password hash");
            false
        }
    }
}

// ════════════════════════════════════════════
// Sign-up / login
// ════════════════════════════════════════════

/// Sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUp {
    fn validate(&self) -> HuddleResult<()> {
        let required = [
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.first_name,
            &self.last_name,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(HuddleError::Validation("please fill in all fields".into()));
        }
        if self.password != self.confirm_password {
            return Err(HuddleError::Validation("passwords do not match".into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(HuddleError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }
}

impl Database {
    /// User with `email`, if any.
    pub fn find_user_by_email(&self, email: &str) -> HuddleResult<Option<User>> {
        self.table_for::<User>()
            .eq("email", email)
            .limit(1)
            .execute()?
            .first_row()
    }

    /// User by id.
    pub fn user(&self, user_id: &str) -> HuddleResult<User> {
        self.table_for::<User>()
            .eq("user_id", user_id)
            .execute()?
            .first_row()?
            .ok_or_else(|| HuddleError::not_found("user", user_id))
    }

    /// Create an account and its default profile (`"<first> <last>"`).
    pub fn sign_up(&self, form: SignUp) -> HuddleResult<User> {
        form.validate()?;
        let email = form.email.trim().to_string();
        if self.find_user_by_email(&email)?.is_some() {
            return Err(HuddleError::Conflict(
                "an account with this email already exists".into(),
            ));
        }

        let user = User {
            user_id: None,
            email,
            password_hash: hash_password(&form.password)?,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            is_active: true,
            email_verified: false,
            created_at: None,
            updated_at: None,
        };
        self.insert_user_with_profile(&user)
    }

    /// Insert `user` plus a default profile named after them.
    pub(crate) fn insert_user_with_profile(&self, user: &User) -> HuddleResult<User> {
        let user: User = self
            .table_for::<User>()
            .insert_row(user)?
            .first_row()?
            .ok_or_else(|| HuddleError::Storage("insert returned no user".into()))?;

        let name = user.full_name();
        self.table_for::<Profile>()
            .insert_row(&Profile::new(user.id(), name.clone(), name))?;

        info!(user_id = user.id(), "account created");
        Ok(user)
    }

    /// Authenticate and fill `session`; the first profile becomes current.
    pub fn login(
        &self,
        session: &mut SessionContext,
        email: &str,
        password: &str,
    ) -> HuddleResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(HuddleError::Validation(
                "please enter both email and password".into(),
            ));
        }
        let user = match self.find_user_by_email(email.trim())? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                warn!("failed login attempt");
                return Err(HuddleError::InvalidCredentials);
            }
        };

        session.clear();
        session.authenticated = true;
        session.user_id = user.user_id.clone();
        session.user_email = Some(user.email.clone());
        session.current_profile = self.profiles_for(user.id())?.into_iter().next();

        info!(user_id = user.id(), "logged in");
        Ok(user)
    }

    // ════════════════════════════════════════════
    // Profiles
    // ════════════════════════════════════════════

    /// Profiles owned by `user_id`, in creation order.
    pub fn profiles_for(&self, user_id: &str) -> HuddleResult<Vec<Profile>> {
        self.table_for::<Profile>()
            .eq("user_id", user_id)
            .execute()?
            .rows()
    }

    /// Profile by id.
    pub fn profile(&self, profile_id: &str) -> HuddleResult<Profile> {
        self.table_for::<Profile>()
            .eq("profile_id", profile_id)
            .execute()?
            .first_row()?
            .ok_or_else(|| HuddleError::not_found("profile", profile_id))
    }

    /// Create a profile; names are required and `profile_name` is unique per user.
    pub fn create_profile(
        &self,
        user_id: &str,
        profile_name: &str,
        display_name: &str,
    ) -> HuddleResult<Profile> {
        let (profile_name, display_name) = (profile_name.trim(), display_name.trim());
        if profile_name.is_empty() || display_name.is_empty() {
            return Err(HuddleError::Validation("please fill in all fields".into()));
        }

        let existing = self
            .table_for::<Profile>()
            .eq("user_id", user_id)
            .eq("profile_name", profile_name)
            .execute()?;
        if !existing.is_empty() {
            return Err(HuddleError::Conflict(
                "you already have a profile with this name".into(),
            ));
        }

        let profile = self
            .table_for::<Profile>()
            .insert_row(&Profile::new(user_id, profile_name, display_name))?
            .first_row()?
            .ok_or_else(|| HuddleError::Storage("insert returned no profile".into()))?;
        debug!(user_id, profile_name, "profile created");
        Ok(profile)
    }

    /// Switch the active profile among the session user's own profiles.
    pub fn select_profile(
        &self,
        session: &mut SessionContext,
        profile_name: &str,
    ) -> HuddleResult<Profile> {
        let user_id = session.require_user()?.to_string();
        let profile = self
            .profiles_for(&user_id)?
            .into_iter()
            .find(|p| p.profile_name == profile_name)
            .ok_or_else(|| HuddleError::not_found("profile", profile_name))?;
        session.current_profile = Some(profile.clone());
        Ok(profile)
    }
}
