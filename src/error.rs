use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaleSyncError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] crate::api::ApiError),

    #[error(transparent)]
    Conversion(#[from] crate::sync::ConversionError),

    #[error(transparent)]
    Diagnostic(#[from] crate::diagnostics::Diagnostic),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
