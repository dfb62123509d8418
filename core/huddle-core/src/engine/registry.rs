//! Table registry: the fixed set of tables the application knows about.

pub const USERS: &str = "users";
pub const PROFILES: &str = "profiles";
pub const POOLS: &str = "pools";
pub const POOL_PARTICIPANTS: &str = "pool_participants";
pub const NFL_TEAMS: &str = "nfl_teams";
pub const TEAM_SELECTIONS: &str = "team_selections";
pub const NFL_SEASONS: &str = "nfl_seasons";
pub const NFL_WEEKS: &str = "nfl_weeks";
pub const NFL_GAMES: &str = "nfl_games";
pub const TEAM_PERFORMANCE: &str = "team_performance";
pub const POOL_SCORES: &str = "pool_scores";

/// Every registered table, in initialization order.
pub const TABLES: [&str; 11] = [
    USERS,
    PROFILES,
    POOLS,
    POOL_PARTICIPANTS,
    NFL_TEAMS,
    TEAM_SELECTIONS,
    NFL_SEASONS,
    NFL_WEEKS,
    NFL_GAMES,
    TEAM_PERFORMANCE,
    POOL_SCORES,
];

/// Clearing order: dependents before the tables they reference.
pub const RESET_ORDER: [&str; 11] = [
    POOL_SCORES,
    TEAM_SELECTIONS,
    POOL_PARTICIPANTS,
    POOLS,
    PROFILES,
    USERS,
    TEAM_PERFORMANCE,
    NFL_GAMES,
    NFL_WEEKS,
    NFL_SEASONS,
    NFL_TEAMS,
];

/// Whether `table` is one of the registered tables.
pub fn is_registered(table: &str) -> bool {
    TABLES.contains(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_order_covers_registry() {
        let mut a = TABLES.to_vec();
        let mut b = RESET_ORDER.to_vec();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_registered() {
        assert!(is_registered("nfl_teams"));
        assert!(!is_registered("scratch"));
    }
}
