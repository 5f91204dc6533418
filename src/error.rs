//! Error types for the form registry

use thiserror::Error;

use crate::element::FormElementKind;

/// Result type for form registry operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Form registry errors
///
/// These are configuration errors only. Validation failures are stored in the
/// error bags of the elements, and stale references are absorbed by the
/// registry, so neither ever shows up here.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Cannot register {kind} with an empty name")]
    EmptyName { kind: FormElementKind },

    #[error("Cannot register an option with an empty value in group '{group}'")]
    EmptyOptionValue { group: String },

    #[error("No form element registered at '{path}'")]
    MissingScope { path: String },

    #[error("Element at '{path}' is a {found}, expected {expected}")]
    ScopeMismatch {
        path: String,
        expected: String,
        found: FormElementKind,
    },

    #[error("'{name}' is already registered as a {existing}, cannot re-register it as a {requested}")]
    KindConflict {
        name: String,
        existing: FormElementKind,
        requested: FormElementKind,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
