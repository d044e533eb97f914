use thiserror::Error;

/// Errors from the array's REST API.
///
/// SECURITY: Error messages must NEVER contain credentials.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials rejected (401/403)
    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection failed, timed out, TLS rejected, ...
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
