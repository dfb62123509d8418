//! # Family Huddle Core: Local Record Store & Pool Services
//!
//! 가족 풋볼 풀 애플리케이션의 핵심 라이브러리입니다.
//! 테이블마다 JSON 파일 하나를 두는 로컬 데이터베이스와, 호스팅 데이터베이스
//! 클라이언트와 같은 형태의 Fluent 쿼리 빌더를 제공합니다.
//!
//! ## 주요 특징
//!
//! - **Fluent 쿼리 빌더**: `table → select/eq/limit → execute|insert|update|delete`
//! - **교체 가능한 저장소**: JSON 파일 / 인메모리 ([`storage::RecordStore`])
//! - **타입 레코드**: `#[derive(Table)]` + serde 변환
//! - **도메인 서비스**: 계정, 프로필, 풀, 팀 선택, 순위, 기준 데이터 시드
//!
//! ## 빠른 시작
//!
//! ```rust
//! use huddle_core::Database;
//! use serde_json::json;
//!
//! # fn main() -> huddle_core::HuddleResult<()> {
//! let db = Database::open_in_memory()?;
//!
//! // 삽입: user_id, created_at 자동 생성
//! db.table("users").insert(json!([
//!     {"email": "a@example.com"},
//!     {"email": "b@example.com"},
//! ]))?;
//!
//! // 조회
//! let result = db.table("users").select("*").eq("email", "b@example.com").execute()?;
//! assert_eq!(result.len(), 1);
//! assert!(result.error.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## 모듈 구조
//!
//! - [`engine`]: 클라이언트 파사드 ([`Database`]), 키/시각 정책, 테이블 레지스트리
//! - [`api`]: 쿼리 빌더, 결과 래퍼, [`api::TableRow`]
//! - [`storage`]: JSON 파일 / 인메모리 저장소
//! - [`model`]: 테이블별 타입 레코드
//! - [`services`]: 계정, 풀, 선택, 순위, 기준 데이터, 시드
//! - [`config`]: 순서 있는 설정 공급자
//! - [`session`]: 세션 상태

// derive(Table)이 생성하는 `huddle_core::` 경로를 크레이트 내부에서도 사용
extern crate self as huddle_core;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod record;
pub mod services;
pub mod session;
pub mod storage;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use api::{QueryResult, TableQuery, TableRow};
pub use engine::Database;
pub use error::{HuddleError, HuddleResult};
pub use record::Record;
pub use session::SessionContext;

// Re-export derive macros
pub use huddle_derive::Table;
