use thiserror::Error;

use crate::ads::AdsError;
use crate::retry::FailureClass;

/// A normalized executor failure.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(
        "Google Ads API credentials are not configured. Please check your environment variables."
    )]
    NotConfigured,

    #[error("Failed to initialize Google Ads client: {0}")]
    Session(String),

    /// Timeout-like failure that outlasted the attempt budget.
    #[error("{message}")]
    RemoteTransient {
        message: String,
        attempts: u32,
        #[source]
        source: AdsError,
    },

    #[error("{message}")]
    RemoteTerminal {
        message: String,
        attempts: u32,
        #[source]
        source: AdsError,
    },

    /// The retry loop ended without a result; indicates a policy bug.
    #[error("Max retry attempts exceeded for reach forecast generation")]
    Unreachable,
}

impl ExecutorError {
    /// Wraps a remote failure, prefixing it with `context` unless the API
    /// reported a structured error.
    pub(crate) fn remote(
        context: &str,
        source: AdsError,
        class: FailureClass,
        attempts: u32,
    ) -> Self {
        let message = if source.is_api() {
            format!("Google Ads API error: {}", source.primary_message())
        } else {
            format!("{}: {}", context, source)
        };

        match class {
            FailureClass::Transient => ExecutorError::RemoteTransient {
                message,
                attempts,
                source,
            },
            FailureClass::Terminal => ExecutorError::RemoteTerminal {
                message,
                attempts,
                source,
            },
        }
    }

    /// Number of remote calls made before the error surfaced.
    pub fn attempts(&self) -> u32 {
        match self {
            ExecutorError::RemoteTransient { attempts, .. }
            | ExecutorError::RemoteTerminal { attempts, .. } => *attempts,
            _ => 0,
        }
    }
}
