use std::fmt;

// Failures reported by a battle server port implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // Request never produced a response (refused, unreachable, timed out).
    Transport(String),
    // Server answered with a non-success status.
    Upstream { status: u16, message: Option<String> },
    // Response body was missing fields or violated snapshot invariants.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "battle server transport error: {err}"),
            ApiError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "battle server error {status}: {message}")
                } else {
                    write!(f, "battle server error {status}")
                }
            }
            ApiError::Decode(err) => write!(f, "battle server response decode error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}
