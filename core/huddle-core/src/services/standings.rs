//! Standings, popularity and dashboard summaries.
//!
//! 읽기 전용입니다. 점수가 없는 참가자는 선택한 팀 점수의 합으로 순위를 매깁니다.

use crate::engine::Database;
use crate::error::{HuddleError, HuddleResult};
use crate::model::{PoolParticipant, PoolScore, Selection, TeamPerformance};
use crate::services::reference::{season_start, week_of_season};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Rows returned by [`Database::team_popularity`].
pub const POPULARITY_TOP_N: usize = 10;

/// One participant's line in the overall standings.
#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub rank: usize,
    pub profile_id: String,
    pub display_name: String,
    /// Team codes in selection order
    pub teams: Vec<String>,
    pub total_points: i64,
    pub selections_complete: bool,
}

/// Season record of one selected team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamReportRow {
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    /// 0.0 ..= 100.0
    pub win_pct: f64,
    pub selected_by: usize,
}

impl TeamReportRow {
    /// `"W-L"`
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// Per-pool line on the home dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSummary {
    pub pool_id: String,
    pub pool_name: String,
    pub season_year: i32,
    pub is_active: bool,
    pub total_points: i64,
    pub rank: Option<u32>,
}

/// Home dashboard for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub active_pools: usize,
    pub teams_selected: usize,
    pub current_week: u32,
    pub pools: Vec<PoolSummary>,
}

/// NFL week in progress on `today`: 0 before September 7, then `1..=18`.
pub fn current_nfl_week(today: NaiveDate) -> u32 {
    let Ok(start) = season_start(today.year()) else {
        return 0;
    };
    if today < start {
        return 0;
    }
    week_of_season(start, today)
}

impl Database {
    /// Most recent score row (last in storage order) of a participant.
    pub fn latest_score(&self, pool_id: &str, profile_id: &str) -> HuddleResult<Option<PoolScore>> {
        let scores: Vec<PoolScore> = self
            .table_for::<PoolScore>()
            .eq("pool_id", pool_id)
            .eq("profile_id", profile_id)
            .execute()?
            .rows()?;
        Ok(scores.into_iter().last())
    }

    /// Overall standings, highest total first; ties keep join order.
    pub fn standings(&self, pool_id: &str) -> HuddleResult<Vec<StandingRow>> {
        let participants = self.participants(pool_id)?;
        let mut rows = Vec::with_capacity(participants.len());

        for participant in participants {
            let display_name = match self.profile(&participant.profile_id) {
                Ok(profile) => profile.display_name,
                Err(HuddleError::NotFound { .. }) => participant.profile_id.clone(),
                Err(e) => return Err(e),
            };
            let picks = self.selected_teams(pool_id, &participant.profile_id)?;
            let total_points = match self.latest_score(pool_id, &participant.profile_id)? {
                Some(score) => score.total_points,
                None => picks.total_points,
            };
            rows.push(StandingRow {
                rank: 0,
                profile_id: participant.profile_id,
                display_name,
                teams: picks.codes(),
                total_points,
                selections_complete: participant.selections_complete,
            });
        }

        rows.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = i + 1;
        }
        Ok(rows)
    }

    /// Selection counts per team label, most selected first (top 10).
    pub fn team_popularity(&self, pool_id: &str) -> HuddleResult<Vec<(String, usize)>> {
        let mut counts: Vec<(String, usize)> = self.selection_counts(pool_id)?.into_values().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(POPULARITY_TOP_N);
        Ok(counts)
    }

    /// team_id → (label, times selected) for every team picked in the pool.
    fn selection_counts(&self, pool_id: &str) -> HuddleResult<HashMap<String, (String, usize)>> {
        let selections: Vec<Selection> = self
            .table_for::<Selection>()
            .eq("pool_id", pool_id)
            .execute()?
            .rows()?;
        let teams = self.teams()?;

        let mut counts: HashMap<String, (String, usize)> = HashMap::new();
        for selection in selections {
            let Some(team) = teams
                .iter()
                .find(|t| t.team_id.as_deref() == Some(selection.team_id.as_str()))
            else {
                continue;
            };
            counts
                .entry(selection.team_id)
                .or_insert_with(|| (team.label(), 0))
                .1 += 1;
        }
        Ok(counts)
    }

    /// W-L and selection count of every team picked in the pool, best record first.
    ///
    /// Uses the latest `team_performance` row per team; teams without one show 0-0.
    pub fn team_report(&self, pool_id: &str) -> HuddleResult<Vec<TeamReportRow>> {
        let performance: Vec<TeamPerformance> = self.table_for::<TeamPerformance>().execute()?.rows()?;

        let mut report: Vec<TeamReportRow> = self
            .selection_counts(pool_id)?
            .into_iter()
            .map(|(team_id, (team, selected_by))| {
                let (wins, losses) = performance
                    .iter()
                    .rev()
                    .find(|p| p.team_id == team_id)
                    .map_or((0, 0), |p| (p.wins, p.losses));
                let played = wins + losses;
                let win_pct = if played > 0 {
                    f64::from(wins) / f64::from(played) * 100.0
                } else {
                    0.0
                };
                TeamReportRow {
                    team,
                    wins,
                    losses,
                    win_pct,
                    selected_by,
                }
            })
            .collect();

        report.sort_by(|a, b| {
            b.win_pct
                .total_cmp(&a.win_pct)
                .then_with(|| a.team.cmp(&b.team))
        });
        Ok(report)
    }

    /// Home dashboard figures for `profile_id` as of `today`.
    pub fn dashboard(&self, profile_id: &str, today: NaiveDate) -> HuddleResult<Dashboard> {
        let participations: Vec<PoolParticipant> = self
            .table_for::<PoolParticipant>()
            .eq("profile_id", profile_id)
            .execute()?
            .rows()?;
        let teams_selected = self
            .table_for::<Selection>()
            .eq("profile_id", profile_id)
            .execute()?
            .len();

        let mut pools = Vec::new();
        for participant in &participations {
            let pool = match self.pool(&participant.pool_id) {
                Ok(pool) => pool,
                Err(HuddleError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            let latest = self.latest_score(&participant.pool_id, profile_id)?;
            pools.push(PoolSummary {
                pool_id: participant.pool_id.clone(),
                pool_name: pool.pool_name,
                season_year: pool.season_year,
                is_active: pool.is_active,
                total_points: latest.as_ref().map_or(0, |s| s.total_points),
                rank: latest.and_then(|s| s.rank_position),
            });
        }

        Ok(Dashboard {
            active_pools: participations.len(),
            teams_selected,
            current_week: current_nfl_week(today),
            pools,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Pool p1 with three participants; pr1 and pr2 have picks, pr3 none.
    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.ensure_teams().unwrap();
        db.table("pools")
            .insert(json!({"pool_id": "p1", "pool_name": "Family", "season_year": 2024,
                "created_by": "u1", "max_participants": 10,
                "registration_deadline": "2024-09-01T00:00:00", "is_active": true}))
            .unwrap();
        for (id, name) in [("pr1", "Ann"), ("pr2", "Ben"), ("pr3", "Cat")] {
            db.table("profiles")
                .insert(json!({"profile_id": id, "user_id": "u1", "profile_name": name, "display_name": name}))
                .unwrap();
            db.join_pool(id, "p1").unwrap();
        }

        let ids: Vec<String> = db.teams().unwrap().into_iter().filter_map(|t| t.team_id).collect();
        // pr1: BUF MIA NE NYJ = 28, pr2: BUF BAL CIN PIT = 36
        db.save_selections("p1", "pr1", &ids[0..4]).unwrap();
        let pr2 = vec![ids[0].clone(), ids[4].clone(), ids[5].clone(), ids[7].clone()];
        db.save_selections("p1", "pr2", &pr2).unwrap();
        db
    }

    #[test]
    fn test_current_nfl_week() {
        assert_eq!(current_nfl_week(date(2024, 9, 6)), 0);
        assert_eq!(current_nfl_week(date(2024, 9, 7)), 1);
        assert_eq!(current_nfl_week(date(2024, 9, 14)), 2);
        assert_eq!(current_nfl_week(date(2024, 12, 31)), 17);
        assert_eq!(current_nfl_week(date(2024, 1, 15)), 0);
        assert_eq!(current_nfl_week(date(2025, 2, 1)), 0);
    }

    #[test]
    fn test_current_week_agrees_with_schedule_week() {
        use crate::services::reference::schedule_week;
        let mut day = date(2024, 9, 7);
        while day <= date(2024, 12, 31) {
            assert_eq!(current_nfl_week(day), schedule_week(2024, day).unwrap(), "{day}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_standings_fall_back_to_team_points() {
        let db = setup();
        let rows = db.standings("p1").unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!((rows[0].rank, rows[0].display_name.as_str(), rows[0].total_points), (1, "Ben", 36));
        assert_eq!((rows[1].rank, rows[1].display_name.as_str(), rows[1].total_points), (2, "Ann", 28));
        assert_eq!((rows[2].rank, rows[2].display_name.as_str(), rows[2].total_points), (3, "Cat", 0));
        assert_eq!(rows[1].teams, ["BUF", "MIA", "NE", "NYJ"]);
        assert!(rows[0].selections_complete);
        assert!(!rows[2].selections_complete);

        // 읽기만 하고 점수를 기록하지 않음
        assert!(db.table("pool_scores").execute().unwrap().is_empty());
    }

    #[test]
    fn test_standings_use_latest_score() {
        let db = setup();
        db.table("pool_scores")
            .insert(json!([
                {"pool_id": "p1", "profile_id": "pr3", "points_earned": 10, "total_points": 10},
                {"pool_id": "p1", "profile_id": "pr3", "points_earned": 90, "total_points": 100, "rank_position": 1},
            ]))
            .unwrap();
        let rows = db.standings("p1").unwrap();
        assert_eq!(rows[0].profile_id, "pr3");
        assert_eq!(rows[0].total_points, 100);
    }

    #[test]
    fn test_standings_ties_keep_join_order() {
        let db = setup();
        db.table("pool_scores")
            .insert(json!([
                {"pool_id": "p1", "profile_id": "pr1", "total_points": 50},
                {"pool_id": "p1", "profile_id": "pr2", "total_points": 50},
                {"pool_id": "p1", "profile_id": "pr3", "total_points": 50},
            ]))
            .unwrap();
        let order: Vec<String> = db.standings("p1").unwrap().into_iter().map(|r| r.profile_id).collect();
        assert_eq!(order, ["pr1", "pr2", "pr3"]);
    }

    #[test]
    fn test_team_popularity() {
        let db = setup();
        let popular = db.team_popularity("p1").unwrap();
        assert_eq!(popular.len(), 7);
        assert_eq!(popular[0], ("Buffalo Bills".to_string(), 2));
        // 동률은 이름순
        assert_eq!(popular[1].0, "Baltimore Ravens");
        assert!(db.team_popularity("empty").unwrap().is_empty());
    }

    #[test]
    fn test_team_report() {
        let db = setup();
        let buf = db.teams().unwrap().into_iter().find(|t| t.team_code == "BUF").unwrap();
        db.table("team_performance")
            .insert(json!({"team_id": buf.team_id, "season_id": "s1", "games_played": 17,
                "wins": 12, "losses": 5, "ties": 0, "win_percentage": 0.706,
                "playoff_made": true, "performance_score": 85.56}))
            .unwrap();

        let report = db.team_report("p1").unwrap();
        assert_eq!(report.len(), 7);
        assert_eq!(report[0].team, "Buffalo Bills");
        assert_eq!(report[0].record(), "12-5");
        assert_eq!(report[0].selected_by, 2);
        assert!((report[0].win_pct - 70.588).abs() < 0.01);
        assert_eq!(report[1].record(), "0-0");
        assert_eq!(report[1].win_pct, 0.0);
    }

    #[test]
    fn test_dashboard() {
        let db = setup();
        db.table("pool_scores")
            .insert(json!({"pool_id": "p1", "profile_id": "pr1", "total_points": 42, "rank_position": 2}))
            .unwrap();

        let dash = db.dashboard("pr1", date(2024, 9, 20)).unwrap();
        assert_eq!(dash.active_pools, 1);
        assert_eq!(dash.teams_selected, 4);
        assert_eq!(dash.current_week, 2);
        assert_eq!(dash.pools[0].pool_name, "Family");
        assert_eq!(dash.pools[0].total_points, 42);
        assert_eq!(dash.pools[0].rank, Some(2));

        let empty = db.dashboard("pr3", date(2024, 8, 1)).unwrap();
        assert_eq!(empty.teams_selected, 0);
        assert_eq!(empty.current_week, 0);
        assert_eq!(empty.pools[0].total_points, 0);
        assert_eq!(empty.pools[0].rank, None);
    }
}
