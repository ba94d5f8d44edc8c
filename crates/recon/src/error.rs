use thiserror::Error;

use crate::model::SourceRole;
use crate::normalize::NormalizeError;

/// Broad failure class. Both classes fail the whole comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The inputs cannot be compared at all (shape, configuration).
    Structural,
    /// A cell failed type-directed validation.
    Validation,
}

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty prefix, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Missing required column in input data.
    #[error("{role} source: missing column '{column}'")]
    MissingColumn { role: SourceRole, column: String },
    /// A row could not produce a complete identity key.
    #[error("{role} source, row {row}: identity field '{field}' is empty")]
    MissingIdentity {
        role: SourceRole,
        row: usize,
        field: String,
    },
    /// A cell failed currency/date validation.
    #[error("{role} source, row {row}, column '{column}': {cause}")]
    InvalidValue {
        role: SourceRole,
        row: usize,
        column: String,
        #[source]
        cause: NormalizeError,
    },
    /// A column pattern in the schema does not compile.
    #[error("invalid column pattern '{pattern}': {message}")]
    ColumnPattern { pattern: String, message: String },
}

impl ReconError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidValue { .. } | Self::MissingIdentity { .. } => ErrorClass::Validation,
            Self::ConfigParse(_)
            | Self::ConfigValidation(_)
            | Self::MissingColumn { .. }
            | Self::ColumnPattern { .. } => ErrorClass::Structural,
        }
    }
}
