//! Error types for pricing operations.

use thiserror::Error;
use treequote_models::ProjectStatus;

/// Errors that can occur during pricing operations.
///
/// All variants are recoverable: the caller corrects the input and retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A numeric input is malformed or out of range.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending input.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Margin outside `[0, 100)`.
    #[error("invalid margin {0}%: must be at least 0 and below 100")]
    InvalidMargin(f64),

    /// Illegal project status change.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: ProjectStatus,
        /// Requested status.
        to: ProjectStatus,
    },
}

impl PricingError {
    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for pricing operations.
pub type Result<T> = std::result::Result<T, PricingError>;
