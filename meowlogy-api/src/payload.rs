use serde_json::Value;

use crate::{error::ApiError, model::Fact};

/// The shapes `GET /catfacts` is known to answer with, decided once at the
/// boundary so nothing downstream has to care which one arrived.
#[derive(Clone, Debug, PartialEq)]
pub enum FactListPayload {
    /// `{"facts": [...], ...}`
    WrappedFacts(Vec<Value>),
    /// `[...]`
    BareFacts(Vec<Value>),
    /// Anything else; carries a short description of what was received.
    Unrecognized(String),
}

impl FactListPayload {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::BareFacts(items),
            Value::Object(mut map) => match map.remove("facts") {
                Some(Value::Array(items)) => Self::WrappedFacts(items),
                Some(other) => Self::Unrecognized(format!("`facts` field is {}", kind(&other))),
                None => Self::Unrecognized("object without a `facts` field".to_owned()),
            },
            other => Self::Unrecognized(kind(&other).to_owned()),
        }
    }

    pub fn into_facts(self) -> Result<Vec<Fact>, ApiError> {
        let items = match self {
            Self::WrappedFacts(items) | Self::BareFacts(items) => items,
            Self::Unrecognized(what) => {
                return Err(ApiError::Format(format!(
                    "expected a fact list, received {}",
                    what
                )));
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value::<Fact>(item)
                    .map_err(|e| ApiError::Format(format!("fact #{idx} is malformed: {e}")))
            })
            .collect()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
