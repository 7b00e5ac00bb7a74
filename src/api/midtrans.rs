use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    api::gateway::{GatewayError, GatewayTransaction, PaymentGateway, TransactionRequest},
    config::MidtransConfig,
};

/// Midtrans Snap client. Built once at startup and shared through
/// [`crate::orders::OrderService`].
#[derive(Clone)]
pub struct MidtransClient {
    http_client: Client,
    base_url: String,
    server_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for MidtransClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidtransClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SnapRequest<'a> {
    transaction_details: TransactionDetails<'a>,
    customer_details: SnapCustomer<'a>,
    item_details: Vec<SnapItem<'a>>,
}

#[derive(Serialize)]
struct TransactionDetails<'a> {
    order_id: &'a str,
    gross_amount: i64,
}

#[derive(Serialize)]
struct SnapCustomer<'a> {
    first_name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Serialize)]
struct SnapItem<'a> {
    id: &'a str,
    price: i64,
    quantity: i32,
    name: &'a str,
}

#[derive(Deserialize)]
struct SnapResponse {
    token: String,
    redirect_url: String,
}

impl<'a> From<&'a TransactionRequest> for SnapRequest<'a> {
    fn from(request: &'a TransactionRequest) -> Self {
        SnapRequest {
            transaction_details: TransactionDetails {
                order_id: &request.order_ref,
                gross_amount: request.gross_amount,
            },
            customer_details: SnapCustomer {
                first_name: &request.customer.name,
                email: &request.customer.email,
                phone: request.customer.phone.as_deref(),
            },
            item_details: request
                .items
                .iter()
                .map(|item| SnapItem {
                    id: &item.id,
                    price: item.price,
                    quantity: item.quantity,
                    name: &item.name,
                })
                .collect(),
        }
    }
}

impl MidtransClient {
    pub fn new(config: &MidtransConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build the Midtrans HTTP client")?;

        tracing::info!(
            is_production = config.is_production,
            base_url = %config.base_url,
            "Midtrans client configured"
        );

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            server_key: config.server_key.clone(),
            timeout: config.timeout,
        })
    }

    fn transactions_url(&self) -> String {
        format!("{}/snap/v1/transactions", self.base_url)
    }
}

#[async_trait]
impl PaymentGateway for MidtransClient {
    async fn create_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<GatewayTransaction, GatewayError> {
        tracing::debug!(
            order_ref = %request.order_ref,
            gross_amount = request.gross_amount,
            "Creating Midtrans transaction"
        );

        let response = self
            .http_client
            .post(self.transactions_url())
            .basic_auth(&self.server_key, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&SnapRequest::from(request))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GatewayError::Timeout(self.timeout)
                } else {
                    GatewayError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SnapResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::InvalidResponse(err.to_string()))?;

        Ok(GatewayTransaction {
            token: body.token,
            redirect_url: body.redirect_url,
        })
    }
}
