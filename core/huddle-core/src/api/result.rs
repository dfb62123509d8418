//! Query result wrapper

use crate::error::{HuddleError, HuddleResult};
use crate::record::{Record, from_record};
use serde::de::DeserializeOwned;

/// 터미널 연산의 결과
///
/// 호스팅 클라이언트의 응답 형태(`data`, `error`)를 그대로 따릅니다.
/// 이 계층에서 `error`는 항상 `None`이며, 실패는 `Err(HuddleError)`로 반환됩니다.
#[derive(Debug, Default)]
pub struct QueryResult {
    /// Records produced or affected, in table storage order
    pub data: Vec<Record>,

    /// Always `None` for the local store
    pub error: Option<HuddleError>,
}

impl QueryResult {
    pub fn new(data: Vec<Record>) -> Self {
        Self { data, error: None }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First record, if any.
    pub fn first(&self) -> Option<&Record> {
        self.data.first()
    }

    /// 첫 번째 레코드를 소유권과 함께 반환 (없으면 `None`)
    pub fn single(self) -> Option<Record> {
        self.data.into_iter().next()
    }

    /// Decode every record into `T`.
    pub fn rows<T: DeserializeOwned>(&self) -> HuddleResult<Vec<T>> {
        self.data.iter().map(from_record).collect()
    }

    /// Decode the first record into `T`.
    pub fn first_row<T: DeserializeOwned>(&self) -> HuddleResult<Option<T>> {
        self.data.first().map(from_record).transpose()
    }

    pub fn into_data(self) -> Vec<Record> {
        self.data
    }
}

impl IntoIterator for QueryResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
