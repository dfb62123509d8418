//! Pools: creation, joining, listings.

use crate::engine::Database;
use crate::error::{HuddleError, HuddleResult};
use crate::model::{Pool, PoolParticipant};
use crate::services::selections::TeamPicks;
use crate::session::SessionContext;
use chrono::{Datelike, Duration};
use std::ops::RangeInclusive;
use tracing::{debug, info};

/// Allowed `max_participants`.
pub const PARTICIPANT_LIMITS: RangeInclusive<u32> = 2..=100;
/// Allowed registration window, in days from now.
pub const DEADLINE_DAYS: RangeInclusive<i64> = 1..=30;

/// Pool creation form.
#[derive(Debug, Clone)]
pub struct NewPool {
    pub pool_name: String,
    pub pool_description: String,
    pub season_year: i32,
    pub entry_fee: f64,
    pub max_participants: u32,
    /// Registration closes this many days from now
    pub deadline_days: i64,
}

/// Active pool the profile has not joined yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolListing {
    pub pool: Pool,
    pub participant_count: usize,
}

impl PoolListing {
    pub fn is_full(&self) -> bool {
        self.participant_count >= self.pool.max_participants as usize
    }
}

/// Pool the profile participates in, with its picks.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPool {
    pub pool: Pool,
    pub participant: PoolParticipant,
    pub picks: TeamPicks,
}

impl Database {
    /// Pool by id.
    pub fn pool(&self, pool_id: &str) -> HuddleResult<Pool> {
        self.table_for::<Pool>()
            .eq("pool_id", pool_id)
            .execute()?
            .first_row()?
            .ok_or_else(|| HuddleError::not_found("pool", pool_id))
    }

    /// Participants of `pool_id`, in join order.
    pub fn participants(&self, pool_id: &str) -> HuddleResult<Vec<PoolParticipant>> {
        self.table_for::<PoolParticipant>()
            .eq("pool_id", pool_id)
            .execute()?
            .rows()
    }

    /// Participation record of `profile_id` in `pool_id`.
    pub fn participant(
        &self,
        pool_id: &str,
        profile_id: &str,
    ) -> HuddleResult<Option<PoolParticipant>> {
        self.table_for::<PoolParticipant>()
            .eq("pool_id", pool_id)
            .eq("profile_id", profile_id)
            .execute()?
            .first_row()
    }

    /// Create a pool owned by the session user and join it with the current profile.
    pub fn create_pool(&self, session: &SessionContext, form: NewPool) -> HuddleResult<Pool> {
        let user_id = session.require_user()?.to_string();
        let profile_id = session.require_profile()?.id().to_string();

        let now = self.policy.now();
        let this_year = now.year();

        let pool_name = form.pool_name.trim();
        if pool_name.is_empty() {
            return Err(HuddleError::Validation("please enter a pool name".into()));
        }
        if !(this_year..=this_year + 1).contains(&form.season_year) {
            return Err(HuddleError::Validation(format!(
                "season year must be {this_year} or {}",
                this_year + 1
            )));
        }
        if !form.entry_fee.is_finite() || form.entry_fee < 0.0 {
            return Err(HuddleError::Validation("entry fee cannot be negative".into()));
        }
        if !PARTICIPANT_LIMITS.contains(&form.max_participants) {
            return Err(HuddleError::Validation(format!(
                "max participants must be between {} and {}",
                PARTICIPANT_LIMITS.start(),
                PARTICIPANT_LIMITS.end()
            )));
        }
        if !DEADLINE_DAYS.contains(&form.deadline_days) {
            return Err(HuddleError::Validation(format!(
                "registration deadline must be {} to {} days from now",
                DEADLINE_DAYS.start(),
                DEADLINE_DAYS.end()
            )));
        }

        let pool = Pool {
            pool_id: None,
            pool_name: pool_name.to_string(),
            pool_description: form.pool_description,
            created_by: user_id,
            season_year: form.season_year,
            entry_fee: form.entry_fee,
            max_participants: form.max_participants,
            registration_deadline: now + Duration::days(form.deadline_days),
            is_active: true,
            created_at: None,
        };
        let pool: Pool = self
            .table_for::<Pool>()
            .insert_row(&pool)?
            .first_row()?
            .ok_or_else(|| HuddleError::Storage("insert returned no pool".into()))?;

        self.join_pool(&profile_id, pool.id())?;
        info!(pool_id = pool.id(), pool_name = %pool.pool_name, "pool created");
        Ok(pool)
    }

    /// Add `profile_id` to an active pool with room left.
    pub fn join_pool(&self, profile_id: &str, pool_id: &str) -> HuddleResult<PoolParticipant> {
        let pool = self.pool(pool_id)?;
        if !pool.is_active {
            return Err(HuddleError::ConstraintViolation(format!(
                "pool '{}' is not active",
                pool.pool_name
            )));
        }

        let participants = self.participants(pool_id)?;
        if participants.iter().any(|p| p.profile_id == profile_id) {
            return Err(HuddleError::Conflict(format!(
                "already a participant of '{}'",
                pool.pool_name
            )));
        }
        if participants.len() >= pool.max_participants as usize {
            return Err(HuddleError::ConstraintViolation("pool is full".into()));
        }

        let participant = PoolParticipant {
            pool_participant_id: None,
            pool_id: pool_id.to_string(),
            profile_id: profile_id.to_string(),
            selections_complete: false,
            joined_at: Some(self.policy.now()),
            created_at: None,
        };
        let participant = self
            .table_for::<PoolParticipant>()
            .insert_row(&participant)?
            .first_row()?
            .ok_or_else(|| HuddleError::Storage("insert returned no participant".into()))?;

        debug!(pool_id, profile_id, "joined pool");
        Ok(participant)
    }

    /// Pool ids `profile_id` participates in.
    fn joined_pool_ids(&self, profile_id: &str) -> HuddleResult<Vec<String>> {
        let rows = self
            .table_for::<PoolParticipant>()
            .select("pool_id")
            .eq("profile_id", profile_id)
            .execute()?;
        Ok(rows
            .data
            .iter()
            .filter_map(|r| r.get("pool_id").and_then(|v| v.as_str()))
            .map(str::to_string)
            .collect())
    }

    /// Active pools `profile_id` has not joined, with participant counts.
    pub fn available_pools(&self, profile_id: &str) -> HuddleResult<Vec<PoolListing>> {
        let joined = self.joined_pool_ids(profile_id)?;
        let pools: Vec<Pool> = self
            .table_for::<Pool>()
            .eq("is_active", true)
            .execute()?
            .rows()?;

        pools
            .into_iter()
            .filter(|pool| !joined.iter().any(|id| id == pool.id()))
            .map(|pool| {
                let participant_count = self.participants(pool.id())?.len();
                Ok(PoolListing {
                    pool,
                    participant_count,
                })
            })
            .collect()
    }

    /// Pools `profile_id` participates in, with ordered picks.
    ///
    /// Participation rows pointing at a deleted pool are skipped.
    pub fn pools_for_profile(&self, profile_id: &str) -> HuddleResult<Vec<JoinedPool>> {
        let participations: Vec<PoolParticipant> = self
            .table_for::<PoolParticipant>()
            .eq("profile_id", profile_id)
            .execute()?
            .rows()?;

        let mut joined = Vec::with_capacity(participations.len());
        for participant in participations {
            let pool = match self.pool(&participant.pool_id) {
                Ok(pool) => pool,
                Err(HuddleError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            let picks = self.selected_teams(pool.id(), profile_id)?;
            joined.push(JoinedPool {
                pool,
                participant,
                picks,
            });
        }
        Ok(joined)
    }
}
