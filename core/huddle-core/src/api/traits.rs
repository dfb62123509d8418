//! API 트레이트 정의

use crate::engine::policy;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 테이블 하나에 대응하는 타입 레코드
///
/// `#[derive(Table)]`이 구현을 생성합니다.
pub trait TableRow: Serialize + DeserializeOwned {
    /// Backing table name
    const TABLE_NAME: &'static str;

    /// Field names, in declaration order.
    fn columns() -> &'static [&'static str];

    /// Primary-key field for [`Self::TABLE_NAME`].
    fn primary_key_field() -> String {
        policy::primary_key_field(Self::TABLE_NAME)
    }
}
