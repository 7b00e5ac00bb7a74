use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

use super::{OrderError, PlaceOrderCommand, PlacementFailure, PlacementTx};
use crate::{
    api::{
        GatewayError, PaymentGateway, TransactionRequest,
        gateway::{CustomerDetails, ItemDetails, truncate_display_name},
    },
    models::{CreateOrderEntity, PaymentStatus},
};

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct PlacedOrder {
    #[serde(rename = "orderId")]
    pub order_id: i32,
    #[serde(rename = "midtransOrderId")]
    pub gateway_order_ref: String,
    #[serde(rename = "midtransToken")]
    pub gateway_token: String,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: String,
}

/// The transactional part of an order placement. An [`super::OrderStore`]
/// opens a transaction, hands it to [`PlacementWork::run`] and commits only
/// if it succeeds.
pub struct PlacementWork<'a> {
    pub command: &'a PlaceOrderCommand,
    pub order_ref: &'a str,
    pub gateway: &'a dyn PaymentGateway,
    pub gateway_timeout: Duration,
}

impl PlacementWork<'_> {
    pub async fn run(self, tx: &mut dyn PlacementTx) -> Result<PlacedOrder, PlacementFailure> {
        let command = self.command;
        let insufficient_stock = || OrderError::InsufficientStock {
            product_id: command.product_id,
        };

        let customer = tx
            .find_customer(command.user_id)
            .await
            .map_err(PlacementFailure::before_reservation)?
            .ok_or(OrderError::UserNotFound(command.user_id))
            .map_err(PlacementFailure::before_reservation)?;

        let product = tx
            .find_product(command.product_id)
            .await
            .map_err(PlacementFailure::before_reservation)?
            .filter(|product| product.stok >= command.quantity)
            .ok_or_else(insufficient_stock)
            .map_err(PlacementFailure::before_reservation)?;

        let reserved = tx
            .reserve_stock(command.product_id, command.quantity, self.order_ref)
            .await
            .map_err(PlacementFailure::after_reservation)?;
        if !reserved {
            return Err(PlacementFailure::before_reservation(insufficient_stock()));
        }

        let pricing = command.pricing;
        let request = TransactionRequest {
            order_ref: self.order_ref.to_string(),
            gross_amount: pricing.total,
            customer: CustomerDetails {
                name: truncate_display_name(&customer.nama),
                email: customer.email,
                phone: customer.no_hp,
            },
            items: vec![ItemDetails {
                id: command.product_id.to_string(),
                name: truncate_display_name(&product.nama),
                price: pricing.unit_price,
                quantity: command.quantity,
            }],
        };

        let transaction = tokio::time::timeout(
            self.gateway_timeout,
            self.gateway.create_transaction(&request),
        )
        .await
        .unwrap_or_else(|_| Err(GatewayError::Timeout(self.gateway_timeout)))
        .map_err(PlacementFailure::after_reservation)?;

        let order_id = tx
            .insert_order(CreateOrderEntity {
                user_id: command.user_id,
                produk_id: command.product_id,
                jumlah: command.quantity,
                total_harga: pricing.total,
                metode_pembayaran: command.payment_method.clone(),
                shipping_id: command.shipping_id,
                catatan: command.note.clone(),
                midtrans_order_id: self.order_ref.to_string(),
                midtrans_transaction_token: transaction.token.clone(),
                status_pembayaran: PaymentStatus::Pending.as_str().to_string(),
            })
            .await
            .map_err(|err| {
                tracing::warn!(
                    order_ref = %self.order_ref,
                    "Gateway transaction was opened but the order row could not be stored"
                );
                PlacementFailure::after_reservation(err)
            })?;

        tx.settle_reservation(self.order_ref)
            .await
            .map_err(PlacementFailure::after_reservation)?;

        Ok(PlacedOrder {
            order_id,
            gateway_order_ref: self.order_ref.to_string(),
            gateway_token: transaction.token,
            redirect_url: transaction.redirect_url,
        })
    }
}
