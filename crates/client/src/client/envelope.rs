//! Response normalization

use crate::error::ClientError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Successful response body
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Parseable JSON body, returned unchanged
    Payload(Value),
    /// Empty or non-JSON body
    Empty,
}

impl Envelope {
    /// Body as JSON; an empty body reads as `{"success": true}`
    pub fn into_value(self) -> Value {
        match self {
            Self::Payload(value) => value,
            Self::Empty => json!({ "success": true }),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Payload(value) => Some(value),
            Self::Empty => None,
        }
    }

    /// The backend answers lookups of missing resources with `{"success": false}`
    pub fn is_failure_marker(&self) -> bool {
        self.payload()
            .and_then(|value| value.get("success"))
            .and_then(Value::as_bool)
            == Some(false)
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.into_value())?)
    }
}

/// Map a status and raw body to an envelope or a typed failure
pub fn classify(status: StatusCode, body: &[u8]) -> Result<Envelope, ClientError> {
    if !status.is_success() {
        let message = String::from_utf8_lossy(body).into_owned();
        let message = if message.trim().is_empty() {
            status.to_string()
        } else {
            message
        };
        return Err(ClientError::from_status(status, message));
    }

    Ok(serde_json::from_slice::<Value>(body).map_or(Envelope::Empty, Envelope::Payload))
}
