use std::time::Duration;

/// Maximum number of characters of a raw backend body kept in an error
pub const ERROR_BODY_LIMIT: usize = 1000;

/// Failure of a single call to the generation backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The call did not finish within its timeout
    #[error("backend request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection or body-read failure
    #[error("backend transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not valid JSON
    #[error("backend returned non-JSON response ({reason}): {excerpt}")]
    Malformed { reason: String, excerpt: String },
}

impl BackendError {
    /// Create status error, truncating the raw body
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: truncate_chars(body, ERROR_BODY_LIMIT).to_string(),
        }
    }

    /// Create malformed-response error, truncating the raw body
    pub fn malformed(reason: impl std::fmt::Display, body: &str) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
            excerpt: truncate_chars(body, ERROR_BODY_LIMIT).to_string(),
        }
    }

    /// Classify a reqwest error raised while sending or reading
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Truncate to at most `max` characters on a char boundary
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// hiersum error types
#[derive(Debug, thiserror::Error)]
pub enum HierSumError {
    /// Generation backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HierSumError {
    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

// HTTP response conversion (used by the actix-web handlers)
impl HierSumError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Backend(_) => 502,
            Self::Config(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}
