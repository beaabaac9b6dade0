//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a deterministic, local validation failure detected before or
/// during a single transaction. None of them is retried; the request/response layer
/// decides how to present them. Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, non-positive price, empty order).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced product, stock record, customer, supplier or order does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A decrement would make a stock quantity negative.
    #[error(
        "insufficient stock for product '{product}' ({product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product: String,
        available: i64,
        requested: i64,
    },

    /// A direct quantity or reorder-level write was out of range.
    #[error("invalid adjustment: {0}")]
    InvalidAdjustment(String),

    /// An order status change is not allowed by the order state machine.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Duplicate creation (e.g. a stock record already exists, a name is taken).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn insufficient_stock(
        product_id: ProductId,
        product: impl Into<String>,
        available: i64,
        requested: i64,
    ) -> Self {
        Self::InsufficientStock {
            product_id,
            product: product.into(),
            available,
            requested,
        }
    }

    pub fn invalid_adjustment(msg: impl Into<String>) -> Self {
        Self::InvalidAdjustment(msg.into())
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::NotFound { .. } => "not_found",
            DomainError::InsufficientStock { .. } => "insufficient_stock",
            DomainError::InvalidAdjustment(_) => "invalid_adjustment",
            DomainError::InvalidTransition { .. } => "invalid_transition",
            DomainError::Conflict(_) => "conflict",
        }
    }
}
