//! Failures of the remote invoicing API.
//!
//! Effects return these through `anyhow`; the notifying error handler finds
//! them again in the failure chain to pick a user-facing message.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// A classified remote failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request never got a response (DNS, connection refused, reset).
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// 5xx, or any status without a more specific variant.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// 4xx carrying per-field messages.
    #[error("validation failed ({status}): {}", summarize(.fields))]
    Validation {
        status: u16,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("not authorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// The response arrived but did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    /// Classify a non-success HTTP response.
    ///
    /// A 4xx body of the form `{"errors": {"field": ["message"]}}` becomes
    /// [`ApiError::Validation`].
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized,
            404 => ApiError::NotFound,
            400..=499 => match parse_field_errors(&body) {
                Some(fields) => ApiError::Validation { status, fields },
                None => ApiError::Server { status, body },
            },
            _ => ApiError::Server { status, body },
        }
    }

    /// Classify a transport-level failure from the HTTP client.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout)
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
            ApiError::Server { status, .. } if *status >= 500 => {
                "Something went wrong on the server. Please try again.".to_string()
            }
            ApiError::Server { .. } => "The request was rejected.".to_string(),
            ApiError::Validation { fields, .. } => fields
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| "Please check the entered values.".to_string()),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::NotFound => "The requested record no longer exists.".to_string(),
            ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

fn parse_field_errors(body: &str) -> Option<BTreeMap<String, Vec<String>>> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        errors: BTreeMap<String, Vec<String>>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.errors)
        .filter(|fields| !fields.is_empty())
}
