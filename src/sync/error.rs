use std::fmt;

use thiserror::Error;

/// Location of a field inside a (possibly nested) state object, rendered the way
/// Terraform users address attributes: `map_root.user.id`, `paths[2]`,
/// `labels["env"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{:?}]", self.0, key))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionErrorKind {
    #[error("expected {expected}, got {value:?}")]
    Incompatible {
        expected: &'static str,
        value: String,
    },

    #[error("value {value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },

    /// The API field has no "absent" representation, so a null state value cannot be sent.
    #[error("attribute is required by the API but the configured value is null")]
    NullRequired,

    #[error("unsupported value {value:?}, expected one of: {}", .allowed.join(", "))]
    UnknownVariant {
        value: String,
        allowed: &'static [&'static str],
    },
}

/// A single field failed to convert; the whole copy is aborted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to convert field `{path}`: {kind}")]
pub struct ConversionError {
    pub path: FieldPath,
    pub kind: ConversionErrorKind,
}

impl ConversionError {
    pub fn new(path: &FieldPath, kind: ConversionErrorKind) -> Self {
        Self {
            path: path.clone(),
            kind,
        }
    }
}
