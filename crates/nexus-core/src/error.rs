//! Error types for nexus-core.

use thiserror::Error;

/// Input validation errors raised before a user action reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Symbol must not be empty")]
    EmptySymbol,

    #[error("Symbol too long: {0}")]
    SymbolTooLong(String),

    #[error("Symbol contains invalid character: {0:?}")]
    InvalidSymbolChar(char),

    #[error("Quantity must be greater than 0")]
    NonPositiveQuantity,

    #[error("Quantity too large: {0}")]
    QuantityTooLarge(i64),
}

/// Result type alias for validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
