// Error types for the gateway.
// Covers transport, status, decode and graph protocol failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("GitHub API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph protocol violation: {0}")]
    Protocol(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Missing GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("Auth token is not a valid header value")]
    InvalidToken,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of a failed gateway operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error, client construction problem, rate limiting or auth failure.
    Transport,
    /// The remote answered with a non-success status.
    Status(u16),
    /// The payload did not match the expected record shape.
    Decode,
    /// The graph response broke the fixed query's contract.
    Protocol,
    /// The caller cancelled the operation.
    Cancelled,
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::Http(e) => match e.status() {
                Some(status) => FailureKind::Status(status.as_u16()),
                None if e.is_decode() => FailureKind::Decode,
                None => FailureKind::Transport,
            },
            GatewayError::Unauthorized => FailureKind::Status(401),
            GatewayError::NotFound(_) => FailureKind::Status(404),
            GatewayError::RateLimited { .. } => FailureKind::Status(403),
            GatewayError::Status { status, .. } => FailureKind::Status(*status),
            GatewayError::Json(_) => FailureKind::Decode,
            GatewayError::Protocol(_) => FailureKind::Protocol,
            GatewayError::Cancelled => FailureKind::Cancelled,
            GatewayError::MissingToken
            | GatewayError::InvalidToken
            | GatewayError::Io(_)
            | GatewayError::Other(_) => FailureKind::Transport,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
