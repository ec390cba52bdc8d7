//! Error types for the Order actor.

use crate::model::OrderStatus;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Write-path failures each get their own variant so callers can branch on them without
/// parsing messages.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order does not exist, or belongs to someone else.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order has already been cancelled or delivered.
    #[error("Order is already {status}")]
    AlreadyTerminal { status: OrderStatus },

    /// The cancellation window closed at `deadline`.
    #[error("Cancellation window closed at {deadline}")]
    WindowExpired { deadline: DateTime<Utc> },

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// Orders are kept for history; the store refuses to remove them.
    #[error("Order {0} cannot be deleted")]
    NotDeletable(String),

    /// The customer placing the order does not exist.
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),

    /// The order store could not be reached.
    #[error("Order store unavailable: {0}")]
    StoreUnavailable(String),
}
