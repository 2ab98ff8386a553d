use thiserror::Error;

use crate::domain::{EntryId, FieldErrors};
use crate::storage::NotFound;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),
}

impl From<NotFound> for AppError {
    fn from(err: NotFound) -> Self {
        AppError::EntryNotFound(err.0)
    }
}

impl AppError {
    /// Field errors, when the failure was a rejected submission.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            AppError::EntryNotFound(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::EntryNotFound(_))
    }
}
