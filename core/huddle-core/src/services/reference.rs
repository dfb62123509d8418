//! NFL reference data: teams, season calendar, performance, schedule.

use crate::engine::Database;
use crate::error::{HuddleError, HuddleResult};
use crate::model::{Conference, Game, GameStatus, Season, Team, TeamPerformance, Week};
use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

/// Regular-season weeks.
pub const REGULAR_SEASON_WEEKS: u32 = 18;
/// Games each team plays in the regular season.
pub const GAMES_PER_SEASON: u32 = 17;

/// Static team entry.
#[derive(Debug, Clone, Copy)]
pub struct TeamSeed {
    pub code: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub conference: Conference,
    pub division: &'static str,
    pub points: i64,
}

const fn team(
    code: &'static str,
    name: &'static str,
    city: &'static str,
    conference: Conference,
    division: &'static str,
    points: i64,
) -> TeamSeed {
    TeamSeed {
        code,
        name,
        city,
        conference,
        division,
        points,
    }
}

use Conference::{Afc, Nfc};

/// The 32 NFL teams, by conference and division.
pub const NFL_TEAMS: [TeamSeed; 32] = [
    team("BUF", "Bills", "Buffalo", Afc, "East", 10),
    team("MIA", "Dolphins", "Miami", Afc, "East", 8),
    team("NE", "Patriots", "New England", Afc, "East", 6),
    team("NYJ", "Jets", "New York", Afc, "East", 4),
    team("BAL", "Ravens", "Baltimore", Afc, "North", 9),
    team("CIN", "Bengals", "Cincinnati", Afc, "North", 7),
    team("CLE", "Browns", "Cleveland", Afc, "North", 5),
    team("PIT", "Steelers", "Pittsburgh", Afc, "North", 10),
    team("HOU", "Texans", "Houston", Afc, "South", 7),
    team("IND", "Colts", "Indianapolis", Afc, "South", 6),
    team("JAX", "Jaguars", "Jacksonville", Afc, "South", 5),
    team("TEN", "Titans", "Tennessee", Afc, "South", 4),
    team("DEN", "Broncos", "Denver", Afc, "West", 6),
    team("KC", "Chiefs", "Kansas City", Afc, "West", 10),
    team("LV", "Raiders", "Las Vegas", Afc, "West", 5),
    team("LAC", "Chargers", "Los Angeles", Afc, "West", 8),
    team("DAL", "Cowboys", "Dallas", Nfc, "East", 9),
    team("NYG", "Giants", "New York", Nfc, "East", 5),
    team("PHI", "Eagles", "Philadelphia", Nfc, "East", 10),
    team("WAS", "Commanders", "Washington", Nfc, "East", 6),
    team("CHI", "Bears", "Chicago", Nfc, "North", 4),
    team("DET", "Lions", "Detroit", Nfc, "North", 9),
    team("GB", "Packers", "Green Bay", Nfc, "North", 8),
    team("MIN", "Vikings", "Minnesota", Nfc, "North", 7),
    team("ATL", "Falcons", "Atlanta", Nfc, "South", 6),
    team("CAR", "Panthers", "Carolina", Nfc, "South", 3),
    team("NO", "Saints", "New Orleans", Nfc, "South", 7),
    team("TB", "Buccaneers", "Tampa Bay", Nfc, "South", 8),
    team("ARI", "Cardinals", "Arizona", Nfc, "West", 5),
    team("LAR", "Rams", "Los Angeles", Nfc, "West", 7),
    team("SF", "49ers", "San Francisco", Nfc, "West", 10),
    team("SEA", "Seahawks", "Seattle", Nfc, "West", 6),
];

impl From<&TeamSeed> for Team {
    fn from(seed: &TeamSeed) -> Self {
        Team {
            team_id: None,
            team_code: seed.code.to_string(),
            team_name: seed.name.to_string(),
            team_city: seed.city.to_string(),
            conference: seed.conference,
            division: seed.division.to_string(),
            points: seed.points,
            is_active: true,
            created_at: None,
        }
    }
}

/// Kickoff date of a season: September 7.
pub fn season_start(year: i32) -> HuddleResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 9, 7)
        .ok_or_else(|| HuddleError::InvalidArguments(format!("invalid season year {year}")))
}

/// Week of `year` in progress on `today` for schedule simulation.
///
/// Past seasons are fully played (19), future ones not started (0).
/// Within the season year the week is clamped to `1..=18`.
pub fn schedule_week(year: i32, today: NaiveDate) -> HuddleResult<u32> {
    if year < today.year() {
        return Ok(REGULAR_SEASON_WEEKS + 1);
    }
    if year > today.year() {
        return Ok(0);
    }
    Ok(week_of_season(season_start(year)?, today))
}

/// 1-based week containing `today` for a season starting `start`, clamped to `1..=18`.
pub fn week_of_season(start: NaiveDate, today: NaiveDate) -> u32 {
    let elapsed = (today - start).num_days().div_euclid(7);
    (elapsed + 1).clamp(1, i64::from(REGULAR_SEASON_WEEKS)) as u32
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl Database {
    /// Insert the 32 teams when `nfl_teams` is empty. Returns how many were inserted.
    pub fn ensure_teams(&self) -> HuddleResult<usize> {
        if !self.table_for::<Team>().limit(1).execute()?.is_empty() {
            return Ok(0);
        }
        let teams: Vec<Team> = NFL_TEAMS.iter().map(Team::from).collect();
        let inserted = self.table_for::<Team>().insert_rows(&teams)?.len();
        info!("Loaded {} NFL teams", inserted);
        Ok(inserted)
    }

    /// Create the current season for `year` and its 18 regular-season weeks.
    pub fn seed_season(&self, year: i32) -> HuddleResult<(Season, Vec<Week>)> {
        let season = Season {
            season_id: None,
            season_year: year,
            regular_season_weeks: REGULAR_SEASON_WEEKS,
            is_current: true,
            created_at: None,
        };
        let season: Season = self
            .table_for::<Season>()
            .insert_row(&season)?
            .first_row()?
            .ok_or_else(|| HuddleError::Storage("insert returned no season".into()))?;
        let season_id = season.season_id.clone().unwrap_or_default();

        let start = season_start(year)?;
        let weeks: Vec<Week> = (1..=REGULAR_SEASON_WEEKS)
            .map(|number| {
                let week_start = start + Duration::weeks(i64::from(number) - 1);
                Week {
                    week_id: None,
                    season_id: season_id.clone(),
                    week_number: number,
                    week_type: "Regular".to_string(),
                    start_date: week_start,
                    end_date: week_start + Duration::days(6),
                    created_at: None,
                }
            })
            .collect();
        let weeks = self.table_for::<Week>().insert_rows(&weeks)?.rows()?;

        info!("Created season {} with {} weeks", year, weeks.len());
        Ok((season, weeks))
    }

    /// Random season record for every team.
    pub fn seed_team_performance<R: Rng + ?Sized>(
        &self,
        season_id: &str,
        rng: &mut R,
    ) -> HuddleResult<Vec<TeamPerformance>> {
        let rows: Vec<TeamPerformance> = self
            .teams()?
            .into_iter()
            .map(|team| {
                let wins: u32 = rng.gen_range(3..=14);
                let playoff_made = wins >= 10;
                let bonus = if playoff_made { 15.0 } else { 0.0 };
                TeamPerformance {
                    performance_id: None,
                    team_id: team.team_id.unwrap_or_default(),
                    season_id: season_id.to_string(),
                    games_played: GAMES_PER_SEASON,
                    wins,
                    losses: GAMES_PER_SEASON - wins,
                    ties: 0,
                    win_percentage: round3(f64::from(wins) / f64::from(GAMES_PER_SEASON)),
                    playoff_made,
                    performance_score: round3(f64::from(wins) * 5.88 + bonus),
                    created_at: None,
                }
            })
            .collect();
        let rows = self.table_for::<TeamPerformance>().insert_rows(&rows)?.rows()?;
        info!("Generated performance for {} teams", rows.len());
        Ok(rows)
    }

    /// Simulated 18-week schedule for `year`, stored in `nfl_games`.
    ///
    /// Weeks before the current week are completed with random scores.
    pub fn generate_schedule<R: Rng + ?Sized>(
        &self,
        year: i32,
        today: NaiveDate,
        rng: &mut R,
    ) -> HuddleResult<Vec<Game>> {
        const GAME_DAY_OFFSETS: [i64; 3] = [0, 3, 4]; // Thu, Sun, Mon

        let start = season_start(year)?;
        let current_week = schedule_week(year, today)?;
        let mut codes: Vec<&str> = NFL_TEAMS.iter().map(|t| t.code).collect();
        let mut games = Vec::with_capacity(REGULAR_SEASON_WEEKS as usize * codes.len() / 2);

        for week in 1..=REGULAR_SEASON_WEEKS {
            let week_start = start + Duration::weeks(i64::from(week) - 1);
            codes.shuffle(rng);
            for pair in codes.chunks_exact(2) {
                let offset = GAME_DAY_OFFSETS[rng.gen_range(0..GAME_DAY_OFFSETS.len())];
                let completed = week < current_week;
                let (home_score, away_score) = if completed {
                    (Some(rng.gen_range(0..=45)), Some(rng.gen_range(0..=45)))
                } else {
                    (None, None)
                };
                games.push(Game {
                    game_id: None,
                    season: year,
                    week,
                    game_date: week_start + Duration::days(offset),
                    home_team: pair[0].to_string(),
                    away_team: pair[1].to_string(),
                    home_score,
                    away_score,
                    game_status: if completed {
                        GameStatus::Completed
                    } else {
                        GameStatus::Scheduled
                    },
                    created_at: None,
                });
            }
        }

        let games = self.table_for::<Game>().insert_rows(&games)?.rows()?;
        info!("Generated {} games for {}", games.len(), year);
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_team_table_shape() {
        let codes: HashSet<&str> = NFL_TEAMS.iter().map(|t| t.code).collect();
        assert_eq!(codes.len(), 32);
        for conference in [Afc, Nfc] {
            for division in ["East", "North", "South", "West"] {
                let n = NFL_TEAMS
                    .iter()
                    .filter(|t| t.conference == conference && t.division == division)
                    .count();
                assert_eq!(n, 4, "{conference} {division}");
            }
        }
    }

    #[test]
    fn test_ensure_teams_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.ensure_teams().unwrap(), 32);
        assert_eq!(db.ensure_teams().unwrap(), 0);
        let teams = db.teams().unwrap();
        assert_eq!(teams.len(), 32);
        assert!(teams.iter().all(|t| t.is_active && t.team_id.is_some()));
    }

    #[test]
    fn test_seed_season_calendar() {
        let db = Database::open_in_memory().unwrap();
        let (season, weeks) = db.seed_season(2024).unwrap();
        assert!(season.is_current);
        assert_eq!(season.regular_season_weeks, 18);
        assert_eq!(weeks.len(), 18);
        assert_eq!(weeks[0].start_date, date(2024, 9, 7));
        assert_eq!(weeks[0].end_date, date(2024, 9, 13));
        assert_eq!(weeks[17].week_number, 18);
        assert_eq!(weeks[17].start_date, date(2025, 1, 4));
        assert!(weeks.iter().all(|w| Some(&w.season_id) == season.season_id.as_ref()));
    }

    #[test]
    fn test_team_performance_formula() {
        let db = Database::open_in_memory().unwrap();
        db.ensure_teams().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let rows = db.seed_team_performance("s1", &mut rng).unwrap();
        assert_eq!(rows.len(), 32);
        for row in &rows {
            assert!((3..=14).contains(&row.wins));
            assert_eq!(row.wins + row.losses, 17);
            assert_eq!(row.playoff_made, row.wins >= 10);
            assert_eq!(row.win_percentage, round3(row.wins as f64 / 17.0));
            let bonus = if row.playoff_made { 15.0 } else { 0.0 };
            assert_eq!(row.performance_score, round3(row.wins as f64 * 5.88 + bonus));
            assert!(row.performance_id.is_some());
        }
    }

    #[test]
    fn test_schedule_week() {
        assert_eq!(schedule_week(2023, date(2024, 10, 1)).unwrap(), 19);
        assert_eq!(schedule_week(2025, date(2024, 10, 1)).unwrap(), 0);
        assert_eq!(schedule_week(2024, date(2024, 3, 1)).unwrap(), 1);
        assert_eq!(schedule_week(2024, date(2024, 9, 7)).unwrap(), 1);
        assert_eq!(schedule_week(2024, date(2024, 9, 21)).unwrap(), 3);
        assert_eq!(schedule_week(2024, date(2024, 12, 31)).unwrap(), 17);
    }

    #[test]
    fn test_week_of_season_clamps() {
        let start = date(2024, 9, 7);
        assert_eq!(week_of_season(start, date(2024, 9, 1)), 1);
        assert_eq!(week_of_season(start, date(2024, 9, 13)), 1);
        assert_eq!(week_of_season(start, date(2024, 9, 14)), 2);
        assert_eq!(week_of_season(start, date(2025, 3, 1)), 18);
    }

    #[test]
    fn test_generate_schedule() {
        let db = Database::open_in_memory().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        // 3주차 진행 중 → 1, 2주차 완료
        let games = db.generate_schedule(2024, date(2024, 9, 22), &mut rng).unwrap();
        assert_eq!(games.len(), 18 * 16);

        for week in 1..=18 {
            let in_week: Vec<&Game> = games.iter().filter(|g| g.week == week).collect();
            assert_eq!(in_week.len(), 16);
            let teams: HashSet<&str> = in_week
                .iter()
                .flat_map(|g| [g.home_team.as_str(), g.away_team.as_str()])
                .collect();
            assert_eq!(teams.len(), 32, "every team plays once in week {week}");

            let week_start = date(2024, 9, 7) + Duration::weeks(week as i64 - 1);
            for game in in_week {
                let offset = (game.game_date - week_start).num_days();
                assert!([0, 3, 4].contains(&offset));
                if week < 3 {
                    assert_eq!(game.game_status, GameStatus::Completed);
                    assert!(game.home_score.is_some_and(|s| s <= 45));
                } else {
                    assert_eq!(game.game_status, GameStatus::Scheduled);
                    assert!(game.home_score.is_none() && game.away_score.is_none());
                }
            }
        }
        assert_eq!(db.table("nfl_games").execute().unwrap().len(), games.len());
    }
}
