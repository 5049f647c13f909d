pub mod documents;
pub mod messages;
pub mod organizations;
pub mod professionals;
pub mod training;
pub mod users;

use time::OffsetDateTime;

pub(crate) fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Set-valued columns are stored as JSON-array TEXT. A column this crate
/// wrote always decodes; anything else falls back to an empty set.
pub(crate) fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_owned())
}

pub(crate) fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}
