use thiserror::Error;

use crate::api::GatewayError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{message}")]
    Validation {
        message: String,
        required_fields: Vec<&'static str>,
    },
    #[error("User #{0} not found")]
    UserNotFound(i32),
    #[error("Insufficient stock for product #{product_id}")]
    InsufficientStock { product_id: i32 },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Persistence failure: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl OrderError {
    pub fn invalid(message: impl Into<String>) -> Self {
        OrderError::Validation {
            message: message.into(),
            required_fields: Vec::new(),
        }
    }
}

/// A failed placement attempt, as reported by an [`super::OrderStore`].
#[derive(Debug)]
pub struct PlacementFailure {
    pub error: OrderError,
    /// Whether a stock decrement may have been issued before the failure.
    /// When set, the service runs the compensating release.
    pub reservation_attempted: bool,
}

impl PlacementFailure {
    pub fn before_reservation(error: impl Into<OrderError>) -> Self {
        Self {
            error: error.into(),
            reservation_attempted: false,
        }
    }

    pub fn after_reservation(error: impl Into<OrderError>) -> Self {
        Self {
            error: error.into(),
            reservation_attempted: true,
        }
    }
}
