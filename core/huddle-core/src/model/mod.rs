//! Typed records: one shape per registered table.
//!
//! 저장소는 스키마 없는 [`Record`](crate::record::Record)만 다루며,
//! 여기의 타입들은 serde로 그 경계에서 변환됩니다.

pub mod accounts;
pub mod nfl;
pub mod pool;
pub mod timestamp;

pub use accounts::{Profile, User};
pub use nfl::{Conference, Game, GameStatus, Season, Team, TeamPerformance, Week};
pub use pool::{Pool, PoolParticipant, PoolScore, Selection};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TableRow;
    use crate::engine::registry;
    use crate::record::{from_record, to_record};
    use serde_json::json;

    #[test]
    fn test_every_registered_table_has_a_model() {
        let mut names = vec![
            User::TABLE_NAME,
            Profile::TABLE_NAME,
            Pool::TABLE_NAME,
            PoolParticipant::TABLE_NAME,
            Team::TABLE_NAME,
            Selection::TABLE_NAME,
            Season::TABLE_NAME,
            Week::TABLE_NAME,
            Game::TABLE_NAME,
            TeamPerformance::TABLE_NAME,
            PoolScore::TABLE_NAME,
        ];
        let mut tables = registry::TABLES.to_vec();
        names.sort();
        tables.sort();
        assert_eq!(names, tables);
    }

    #[test]
    fn test_primary_key_is_first_column() {
        assert_eq!(User::columns()[0], User::primary_key_field());
        assert_eq!(Team::columns()[0], Team::primary_key_field());
        assert_eq!(Selection::columns()[0], Selection::primary_key_field());
        assert_eq!(PoolScore::columns()[0], PoolScore::primary_key_field());
        assert_eq!(TeamPerformance::columns()[0], "team_performanc_id");
    }

    #[test]
    fn test_team_defaults_and_enum_text() {
        let record = json!({
            "team_id": "t1",
            "team_code": "KC",
            "team_name": "Chiefs",
            "team_city": "Kansas City",
            "conference": "AFC",
            "division": "West"
        });
        let team: Team = from_record(record.as_object().unwrap()).unwrap();
        assert_eq!(team.points, nfl::DEFAULT_TEAM_POINTS);
        assert!(team.is_active);
        assert_eq!(team.conference, Conference::Afc);
        assert_eq!(team.label(), "Kansas City Chiefs");

        let back = to_record(&team).unwrap();
        assert_eq!(back["conference"], json!("AFC"));
        assert!(!back.contains_key("created_at"));
    }

    #[test]
    fn test_legacy_timestamps_decode() {
        let record = json!({
            "pool_participant_id": "pp1",
            "pool_id": "p1",
            "profile_id": "pr1",
            "selections_complete": false,
            "joined_at": "2024-09-01T10:00:00",
            "created_at": "2024-09-01T10:00:00.000123"
        });
        let participant: PoolParticipant = from_record(record.as_object().unwrap()).unwrap();
        assert!(participant.joined_at.is_some());

        let back = to_record(&participant).unwrap();
        assert_eq!(back["joined_at"], json!("2024-09-01T10:00:00.000000"));
        assert_eq!(back["created_at"], json!("2024-09-01T10:00:00.000123"));
    }

    #[test]
    fn test_game_status_text() {
        assert_eq!(serde_json::to_value(GameStatus::Completed).unwrap(), json!("COMPLETED"));
        assert_eq!(serde_json::to_value(GameStatus::Scheduled).unwrap(), json!("SCHEDULED"));
    }
}
