//! API 모듈: Fluent 스타일 API
//!
//! TableQuery, QueryResult, TableRow 제공

pub mod query;
pub mod result;
pub mod traits;

pub use query::TableQuery;
pub use result::QueryResult;
pub use traits::TableRow;
