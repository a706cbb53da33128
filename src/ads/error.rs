use serde::Deserialize;
use thiserror::Error;

/// A failed call to the reach-planning API.
#[derive(Debug, Error)]
pub enum AdsError {
    /// Structured error payload returned by the API.
    #[error("{status}: {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
        /// Messages of the individual failures, in the order reported.
        details: Vec<String>,
    },

    /// Non-2xx response whose body is not a structured error payload.
    #[error("HTTP {code}: {body}")]
    Http { code: u16, body: String },

    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("{0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    errors: Vec<FailureEntry>,
}

#[derive(Deserialize)]
struct FailureEntry {
    #[serde(default)]
    message: String,
}

impl AdsError {
    /// Builds an error from a non-2xx response body.
    pub fn from_response(code: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let payload = envelope.error;
                let details = payload
                    .details
                    .into_iter()
                    .flat_map(|d| d.errors)
                    .map(|e| e.message)
                    .filter(|m| !m.is_empty())
                    .collect();
                AdsError::Api {
                    code: payload.code.unwrap_or(code),
                    status: payload.status,
                    message: payload.message,
                    details,
                }
            }
            Err(_) => AdsError::Http {
                code,
                body: body.trim().to_string(),
            },
        }
    }

    /// Whether the API itself reported the failure in a structured payload.
    pub fn is_api(&self) -> bool {
        matches!(self, AdsError::Api { .. })
    }

    /// The most specific human-readable message available.
    ///
    /// For structured payloads this is the first detail message, then the
    /// top-level message. Anything else falls back to the full error text.
    pub fn primary_message(&self) -> String {
        match self {
            AdsError::Api {
                message, details, ..
            } => details
                .first()
                .cloned()
                .filter(|m| !m.is_empty())
                .or_else(|| Some(message.clone()).filter(|m| !m.is_empty()))
                .unwrap_or_else(|| self.to_string()),
            _ => self.to_string(),
        }
    }
}

impl AdsError {
    /// Everything the error reports, for transient/terminal classification.
    ///
    /// Structured payloads contribute their status, message and every detail.
    pub fn classification_text(&self) -> String {
        match self {
            AdsError::Api {
                status,
                message,
                details,
                ..
            } => [status, message]
                .into_iter()
                .chain(details)
                .filter(|part| !part.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(": "),
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for AdsError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AdsError::Timeout(error.to_string())
        } else if error.is_decode() {
            AdsError::Decode(error.to_string())
        } else {
            AdsError::Transport(error.to_string())
        }
    }
}
