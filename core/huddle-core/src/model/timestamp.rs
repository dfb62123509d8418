//! Serde helpers for stored timestamps.
//!
//! 저장 형식: `YYYY-MM-DDTHH:MM:SS.ffffff` (오프셋 없음).
//! 읽을 때는 소수 초가 없거나 공백 구분자를 쓰는 값도 허용합니다.

use crate::engine::policy::format_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

const ACCEPTED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a stored timestamp.
pub fn parse(text: &str) -> Option<NaiveDateTime> {
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'")))
}

/// `Option<NaiveDateTime>` variant; pair with `default` and `skip_serializing_if`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&format_timestamp(*ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{text}'"))),
            None => Ok(None),
        }
    }
}
