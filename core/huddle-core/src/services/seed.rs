//! Seeding: reference data plus sample accounts and a sample pool.

use crate::engine::Database;
use crate::engine::registry::{NFL_TEAMS as NFL_TEAMS_TABLE, RESET_ORDER};
use crate::error::{HuddleError, HuddleResult};
use crate::model::{Pool, User};
use crate::services::accounts::hash_password;
use chrono::{Datelike, Duration, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

/// Password of the sample accounts.
pub const SAMPLE_PASSWORD: &str = "password";

/// `(email, first name, last name)` of the sample accounts.
pub const SAMPLE_USERS: [(&str, &str, &str); 2] = [
    ("test@example.com", "Test", "User"),
    ("john@example.com", "John", "Doe"),
];

/// Seeding parameters.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Season year to create
    pub year: i32,
    /// Date used to decide which games are already played
    pub today: NaiveDate,
    /// Clear every table first when data already exists
    pub force: bool,
    /// Fixed RNG seed for reproducible data; random when `None`
    pub rng_seed: Option<u64>,
}

impl SeedOptions {
    /// Current season as of `today`, no reset, random seed.
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            today,
            force: false,
            rng_seed: None,
        }
    }
}

/// Row counts written by a seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub season_id: String,
    pub teams: usize,
    pub weeks: usize,
    pub team_performance: usize,
    pub games: usize,
    pub users: usize,
    pub profiles: usize,
    pub pools: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Teams exist and `force` was not set; nothing written
    AlreadyInitialized,
    Seeded(SeedReport),
}

impl Database {
    /// Clear every registered table, dependents first.
    pub fn reset_all(&self) -> HuddleResult<()> {
        for table in RESET_ORDER {
            self.reset_table(table)?;
        }
        Ok(())
    }

    /// Seed reference and sample data.
    #[instrument(skip(self))]
    pub fn initialize(&self, options: SeedOptions) -> HuddleResult<SeedOutcome> {
        let has_teams = !self.table(NFL_TEAMS_TABLE).limit(1).execute()?.is_empty();
        if has_teams {
            if !options.force {
                info!("Data already exists, skipping initialization");
                return Ok(SeedOutcome::AlreadyInitialized);
            }
            info!("Clearing existing data");
            self.reset_all()?;
        }

        let mut rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut report = SeedReport {
            teams: self.ensure_teams()?,
            ..SeedReport::default()
        };

        let (season, weeks) = self.seed_season(options.year)?;
        report.season_id = season.season_id.unwrap_or_default();
        report.weeks = weeks.len();
        report.team_performance = self.seed_team_performance(&report.season_id, &mut rng)?.len();
        report.games = self
            .generate_schedule(options.year, options.today, &mut rng)?
            .len();

        let users = self.seed_sample_users()?;
        report.users = users.len();
        report.profiles = users.len();

        if let Some(owner) = users.first() {
            self.seed_sample_pool(owner, options.year)?;
            report.pools = 1;
        }

        info!(?report, "Initialization complete");
        Ok(SeedOutcome::Seeded(report))
    }

    fn seed_sample_users(&self) -> HuddleResult<Vec<User>> {
        let password_hash = hash_password(SAMPLE_PASSWORD)?;
        SAMPLE_USERS
            .iter()
            .map(|(email, first, last)| {
                let user = User {
                    user_id: None,
                    email: (*email).to_string(),
                    password_hash: password_hash.clone(),
                    first_name: (*first).to_string(),
                    last_name: (*last).to_string(),
                    is_active: true,
                    email_verified: true,
                    created_at: None,
                    updated_at: None,
                };
                self.insert_user_with_profile(&user)
            })
            .collect()
    }

    fn seed_sample_pool(&self, owner: &User, year: i32) -> HuddleResult<Pool> {
        let pool = Pool {
            pool_id: None,
            pool_name: format!("Family Pool {year}"),
            pool_description: "Annual family football pool - may the best teams win!".into(),
            created_by: owner.id().to_string(),
            season_year: year,
            entry_fee: 20.0,
            max_participants: 20,
            registration_deadline: self.policy.now() + Duration::days(7),
            is_active: true,
            created_at: None,
        };
        self.table_for::<Pool>()
            .insert_row(&pool)?
            .first_row()?
            .ok_or_else(|| HuddleError::Storage("insert returned no pool".into()))
    }
}
