use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single cat-fact record. Only `fact` is guaranteed; the rest is whatever
/// metadata the collaborator chose to send along.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Fact {
    pub fact: String,
    #[serde(
        default,
        deserialize_with = "optional_id_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<u64>,
}

impl Fact {
    pub fn new(fact: impl Into<String>) -> Self {
        Self {
            fact: fact.into(),
            id: None,
            created_at: None,
            likes_count: None,
        }
    }
}

/// Ids arrive as strings or integers depending on the backing store.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

fn optional_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "fact id must be a string or number, got {other}"
        ))),
    }
}

/// Reply to `POST /catfacts`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AddFactResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Fact>,
}

impl AddFactResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Reply to like/unlike/delete calls.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub ai_service: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AskRequest<'a> {
    pub question: &'a str,
}
