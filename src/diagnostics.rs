use std::fmt::Debug;

use thiserror::Error;

use crate::api::ApiError;
use crate::sync::{ConversionError, Value};

/// User-facing error attached to a failing resource or data source operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{summary}: {detail}")]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
    /// Attribute path the diagnostic points at, when there is one.
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn conversion(summary: impl Into<String>, err: &ConversionError) -> Self {
        Self::error(summary, err.to_string()).with_attribute(err.path.as_str())
    }

    pub fn api(summary: impl Into<String>, err: &ApiError) -> Self {
        Self::error(summary, err.to_string())
    }
}

/// Rejects a plan that changes an attribute the API cannot update in place.
///
/// Only a known planned value that differs from a known prior value fails.
pub fn ensure_unchanged<T: PartialEq + Debug>(
    attribute: &str,
    prior: &Value<T>,
    planned: &Value<T>,
) -> Result<(), Diagnostic> {
    match (prior, planned) {
        (Value::Known(prior), Value::Known(planned)) if prior != planned => Err(Diagnostic::error(
            format!("may not change {attribute}"),
            format!("{attribute} cannot be changed from {prior:?} to {planned:?}"),
        )
        .with_attribute(attribute)),
        _ => Ok(()),
    }
}
