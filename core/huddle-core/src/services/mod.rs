//! Domain services: `impl Database` blocks grouped by concern.
//!
//! 모든 서비스는 쿼리 빌더 위에서 동작하며, 도메인 실패는 타입 있는 에러
//! (`Validation`, `Conflict`, `NotFound`, ...)로 반환합니다.

pub mod accounts;
pub mod pools;
pub mod reference;
pub mod seed;
pub mod selections;
pub mod standings;

pub use accounts::{HASH_COST, SignUp, hash_password, hash_password_with_cost, verify_password};
pub use pools::{JoinedPool, NewPool, PoolListing};
pub use reference::NFL_TEAMS;
pub use seed::{SeedOptions, SeedOutcome, SeedReport};
pub use selections::{SELECTION_SIZE, SelectedTeam, TeamPicks};
pub use standings::{Dashboard, PoolSummary, StandingRow, TeamReportRow, current_nfl_week};
