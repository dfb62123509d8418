//! Team selections: exactly four teams per (pool, profile).

use crate::engine::Database;
use crate::error::{HuddleError, HuddleResult};
use crate::model::{PoolParticipant, Selection, Team};
use serde_json::json;
use std::collections::HashSet;
use tracing::info;

/// Teams each participant picks per pool.
pub const SELECTION_SIZE: usize = 4;

/// One pick resolved against `nfl_teams`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTeam {
    pub selection_order: u32,
    pub team: Team,
}

/// A participant's picks in selection order, with the sum of team points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPicks {
    pub picks: Vec<SelectedTeam>,
    pub total_points: i64,
}

impl TeamPicks {
    /// Team codes in selection order.
    pub fn codes(&self) -> Vec<String> {
        self.picks.iter().map(|p| p.team.team_code.clone()).collect()
    }
}

impl Database {
    /// Every team, in storage order.
    pub fn teams(&self) -> HuddleResult<Vec<Team>> {
        self.table_for::<Team>().execute()?.rows()
    }

    /// Team by id.
    pub fn team(&self, team_id: &str) -> HuddleResult<Option<Team>> {
        self.table_for::<Team>()
            .eq("team_id", team_id)
            .execute()?
            .first_row()
    }

    fn set_selections_complete(
        &self,
        pool_id: &str,
        profile_id: &str,
        complete: bool,
    ) -> HuddleResult<()> {
        self.table_for::<PoolParticipant>()
            .eq("pool_id", pool_id)
            .eq("profile_id", profile_id)
            .update_with(&json!({ "selections_complete": complete }))?;
        Ok(())
    }

    /// Replace the picks of `profile_id` in `pool_id` with `team_ids` (in order).
    pub fn save_selections(
        &self,
        pool_id: &str,
        profile_id: &str,
        team_ids: &[String],
    ) -> HuddleResult<Vec<Selection>> {
        if team_ids.len() != SELECTION_SIZE {
            return Err(HuddleError::Validation(format!(
                "please select exactly {SELECTION_SIZE} teams, got {}",
                team_ids.len()
            )));
        }
        let distinct: HashSet<&String> = team_ids.iter().collect();
        if distinct.len() != team_ids.len() {
            return Err(HuddleError::Validation("teams must be distinct".into()));
        }

        let known: HashSet<String> = self
            .teams()?
            .into_iter()
            .filter_map(|t| t.team_id)
            .collect();
        if let Some(missing) = team_ids.iter().find(|id| !known.contains(*id)) {
            return Err(HuddleError::not_found("team", missing.as_str()));
        }
        if self.participant(pool_id, profile_id)?.is_none() {
            return Err(HuddleError::not_found(
                "pool participant",
                format!("{profile_id} in {pool_id}"),
            ));
        }

        self.table_for::<Selection>()
            .eq("pool_id", pool_id)
            .eq("profile_id", profile_id)
            .delete()?;

        let rows: Vec<Selection> = team_ids
            .iter()
            .zip(1u32..)
            .map(|(team_id, order)| Selection {
                team_selection_id: None,
                pool_id: pool_id.to_string(),
                profile_id: profile_id.to_string(),
                team_id: team_id.clone(),
                selection_order: order,
                created_at: None,
            })
            .collect();
        let saved = self.table_for::<Selection>().insert_rows(&rows)?.rows()?;

        self.set_selections_complete(pool_id, profile_id, true)?;
        info!(pool_id, profile_id, "selections saved");
        Ok(saved)
    }

    /// Remove the picks and mark the participant incomplete.
    pub fn clear_selections(&self, pool_id: &str, profile_id: &str) -> HuddleResult<usize> {
        let removed = self
            .table_for::<Selection>()
            .eq("pool_id", pool_id)
            .eq("profile_id", profile_id)
            .delete()?
            .len();
        self.set_selections_complete(pool_id, profile_id, false)?;
        Ok(removed)
    }

    /// Picks ordered by `selection_order`.
    pub fn selections_for(&self, pool_id: &str, profile_id: &str) -> HuddleResult<Vec<Selection>> {
        let mut selections: Vec<Selection> = self
            .table_for::<Selection>()
            .eq("pool_id", pool_id)
            .eq("profile_id", profile_id)
            .execute()?
            .rows()?;
        selections.sort_by_key(|s| s.selection_order);
        Ok(selections)
    }

    /// Picks joined against `nfl_teams`; picks of unknown teams are skipped.
    pub fn selected_teams(&self, pool_id: &str, profile_id: &str) -> HuddleResult<TeamPicks> {
        let teams = self.teams()?;
        let picks: Vec<SelectedTeam> = self
            .selections_for(pool_id, profile_id)?
            .into_iter()
            .filter_map(|s| {
                teams
                    .iter()
                    .find(|t| t.team_id.as_deref() == Some(s.team_id.as_str()))
                    .map(|team| SelectedTeam {
                        selection_order: s.selection_order,
                        team: team.clone(),
                    })
            })
            .collect();
        let total_points = picks.iter().map(|p| p.team.points).sum();
        Ok(TeamPicks {
            picks,
            total_points,
        })
    }
}
