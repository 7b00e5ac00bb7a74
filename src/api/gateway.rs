use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Longest display name the gateway accepts for customers and line items.
pub const DISPLAY_NAME_LIMIT: usize = 50;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetails {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
}

/// Everything the gateway needs to open one payment transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub order_ref: String,
    pub gross_amount: i64,
    pub customer: CustomerDetails,
    pub items: Vec<ItemDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayTransaction {
    pub token: String,
    pub redirect_url: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway did not answer within {0:?}")]
    Timeout(Duration),
    #[error("payment gateway request failed: {0}")]
    Transport(String),
    #[error("payment gateway rejected the transaction (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("payment gateway returned an unexpected response: {0}")]
    InvalidResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a payment transaction and returns the checkout token and URL.
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<GatewayTransaction, GatewayError>;
}

/// Shortens `name` to at most [`DISPLAY_NAME_LIMIT`] characters, marking the
/// cut with an ellipsis.
pub fn truncate_display_name(name: &str) -> String {
    truncate_with_ellipsis(name, DISPLAY_NAME_LIMIT)
}

fn truncate_with_ellipsis(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = name.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
