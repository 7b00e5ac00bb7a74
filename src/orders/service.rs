use std::{sync::Arc, time::Duration};

use super::{
    OrderError, OrderStore, PlaceOrderRequest, PlacedOrder, PlacementWork,
    history::{OrderHistoryPage, PageRequest},
    reference::generate_order_ref,
};
use crate::api::PaymentGateway;

/// Places orders and serves order history. Holds the store and the payment
/// gateway it was constructed with; nothing is looked up globally.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
    gateway_timeout: Duration,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            store,
            gateway,
            gateway_timeout,
        }
    }

    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<PlacedOrder, OrderError> {
        let command = request.validate()?;
        let order_ref = generate_order_ref(command.user_id);

        tracing::info!(
            order_ref = %order_ref,
            user_id = command.user_id,
            product_id = command.product_id,
            quantity = command.quantity,
            total = command.pricing.total,
            "Placing order"
        );

        let work = PlacementWork {
            command: &command,
            order_ref: &order_ref,
            gateway: self.gateway.as_ref(),
            gateway_timeout: self.gateway_timeout,
        };

        match self.store.place(work).await {
            Ok(placed) => {
                tracing::info!(
                    order_ref = %order_ref,
                    order_id = placed.order_id,
                    "Order #{} has been placed",
                    placed.order_id
                );
                Ok(placed)
            }
            Err(failure) => {
                tracing::error!(
                    order_ref = %order_ref,
                    error = %failure.error,
                    "Order placement failed, transaction rolled back"
                );
                if failure.reservation_attempted {
                    self.release_reservation(&order_ref, command.product_id, command.quantity)
                        .await;
                }
                Err(failure.error)
            }
        }
    }

    pub async fn user_exists(&self, user_id: i32) -> Result<bool, OrderError> {
        Ok(self.store.user_exists(user_id).await?)
    }

    pub async fn order_history(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<OrderHistoryPage, OrderError> {
        Ok(self.store.order_history(user_id, page).await?)
    }

    /// Best-effort compensation. Failures are logged for manual
    /// reconciliation and never reach the caller.
    async fn release_reservation(&self, order_ref: &str, product_id: i32, quantity: i32) {
        match self.store.release_reservation(order_ref).await {
            Ok(Some(restored)) => tracing::warn!(
                order_ref,
                product_id,
                restored,
                "Restored stock of a reservation left behind by a failed placement"
            ),
            Ok(None) => tracing::debug!(order_ref, "No outstanding reservation to release"),
            Err(err) => tracing::error!(
                order_ref,
                product_id,
                quantity,
                error = ?err,
                "Failed to restore reserved stock, manual reconciliation required"
            ),
        }
    }
}
