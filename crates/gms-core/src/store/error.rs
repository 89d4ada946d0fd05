use std::fmt;

use thiserror::Error;

use crate::validate::ValidationReport;

/// The two resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Garden,
    Plant,
}

impl Entity {
    /// Capitalized form for user-facing messages ("Garden deleted ...").
    pub fn title(self) -> &'static str {
        match self {
            Self::Garden => "Garden",
            Self::Plant => "Plant",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Garden => "garden",
            Self::Plant => "plant",
        };
        f.write_str(s)
    }
}

/// Failure of a store operation.
///
/// Only [`StoreError::Validation`] is user-correctable; everything else is
/// reported to HTTP callers as a generic server error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(ValidationReport),

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    #[error("malformed {entity} id {id:?}")]
    MalformedId { entity: Entity, id: String },

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationReport> for StoreError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}
