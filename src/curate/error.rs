use crate::schema::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurateError {
    #[error("{kind} is missing required field(s): {}", .missing.join(", "))]
    Validation {
        kind: EntityKind,
        missing: Vec<String>,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Cannot move a record from {source_scope} into {target_scope}")]
    ScopeMismatch {
        source_scope: String,
        target_scope: String,
    },

    #[error("Position {index} is out of range for {scope} ({len} records)")]
    PositionOutOfRange {
        scope: String,
        index: usize,
        len: usize,
    },

    #[error("Identity conflict: {0}")]
    IdentityConflict(String),

    #[error("Field '{field}' is not editable: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Layout is out of date, the collection changed since it was opened")]
    StaleLayout,

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence sink error: {0}")]
    Sink(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl CurateError {
    /// Errors the editor treats as a silent no-op against a stale reference.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CurateError::NotFound(_) | CurateError::ScopeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CurateError>;
