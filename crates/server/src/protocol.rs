//! Response envelope and status mapping for the HTTP API.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use spawngrid::{BucketRecord, SpawnError};

/// How errors map to HTTP status codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Malformed input is a client error (400); everything else is 500.
    #[default]
    Strict,
    /// Every error is a 500, as the first deployed service answered.
    Legacy,
}

impl StatusPolicy {
    pub fn status_for(self, err: &SpawnError) -> StatusCode {
        match self {
            Self::Strict if err.is_invalid_input() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&SpawnError> for ErrorBody {
    fn from(err: &SpawnError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: spawngrid::VERSION.to_string(),
        }
    }
}

/// Serialize a lookup result into the JSON response body.
pub fn render_body(record: &BucketRecord) -> Result<Vec<u8>, SpawnError> {
    Ok(serde_json::to_vec(record)?)
}
