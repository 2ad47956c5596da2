//! Request and response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{normalize::NormalizationResult, pipeline::Extraction};

use super::error::ApiError;

/// Validated body of `POST /bio-ner/entities`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitiesRequest {
    pub text: String,
}

impl TryFrom<Value> for EntitiesRequest {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ApiError::MalformedRequest("body must be a JSON object".into()));
        };
        match map.get("text") {
            Some(Value::String(text)) if !text.is_empty() => Ok(Self { text: text.clone() }),
            Some(Value::String(_)) => Err(ApiError::MalformedRequest("`text` must not be empty".into())),
            Some(_) => Err(ApiError::MalformedRequest("`text` must be a string".into())),
            None => Err(ApiError::MalformedRequest("missing required field `text`".into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitiesResponse {
    pub html: String,
    pub entities: NormalizationResult,
}

impl From<Extraction> for EntitiesResponse {
    fn from(value: Extraction) -> Self {
        EntitiesResponse {
            html: value.html,
            entities: value.entities,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
