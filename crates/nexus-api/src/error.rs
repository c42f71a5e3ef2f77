//! API error types.

use thiserror::Error;

/// Failure taxonomy at the fetch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, timeout, reset, ...
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Body is not the JSON we expected.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// 2xx response carrying an `error` field.
    #[error("{0}")]
    Application(String),

    /// Client construction or request building failed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Application(_) => "application",
            Self::Client(_) => "client",
        }
    }

    /// Message suitable for a user-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            Self::Application(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
