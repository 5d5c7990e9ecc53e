use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding failures are deliberately collapsed into `InvalidToken`: a caller
/// cannot tell a malformed token from a forged or expired one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid or expired")]
    InvalidToken,
}
