use anyhow::Result;
use async_trait::async_trait;

use super::{
    PlacedOrder, PlacementFailure, PlacementWork,
    history::{OrderHistoryPage, PageRequest},
};
use crate::models::{CreateOrderEntity, CustomerEntity, ProductStockEntity};

/// Statements available to an order placement while its transaction is open.
#[async_trait]
pub trait PlacementTx: Send {
    async fn find_customer(&mut self, user_id: i32) -> Result<Option<CustomerEntity>>;

    async fn find_product(&mut self, product_id: i32) -> Result<Option<ProductStockEntity>>;

    /// Decrements stock only if at least `quantity` units remain, and records
    /// the decrement in the reservation ledger under `order_ref`. Returns
    /// `false` when no row qualified.
    async fn reserve_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
        order_ref: &str,
    ) -> Result<bool>;

    /// Inserts the order row and returns its id.
    async fn insert_order(&mut self, order: CreateOrderEntity) -> Result<i32>;

    /// Marks the reservation as backed by a persisted order.
    async fn settle_reservation(&mut self, order_ref: &str) -> Result<()>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Whether an account with this id still exists.
    async fn user_exists(&self, user_id: i32) -> Result<bool>;

    /// Runs `work` in a single transaction, committing only if it succeeds.
    async fn place(&self, work: PlacementWork<'_>) -> Result<PlacedOrder, PlacementFailure>;

    /// Gives back the stock of a reservation that is not backed by an order.
    /// Returns the restored quantity, or `None` when nothing was outstanding.
    async fn release_reservation(&self, order_ref: &str) -> Result<Option<i32>>;

    async fn order_history(&self, user_id: i32, page: PageRequest) -> Result<OrderHistoryPage>;
}
