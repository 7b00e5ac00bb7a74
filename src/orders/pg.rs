use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{
    ExpressionMethods, NullableExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper,
    pg::Pg, query_builder::QueryFragment,
};
use diesel_async::{
    AsyncConnection, AsyncPgConnection, RunQueryDsl,
    methods::{ExecuteDsl, LoadQuery},
};

use super::{
    OrderStore, PlacedOrder, PlacementFailure, PlacementTx, PlacementWork,
    history::{OrderHistoryPage, PageRequest},
};
use crate::{
    db::DbPool,
    models::{
        CreateOrderEntity, CreateStockReservationEntity, CustomerEntity, OrderEntity,
        OrderHistoryEntity, ProductStockEntity,
    },
    schema::{metode_pengiriman, pemesanan, produk, stock_reservations, users},
};

/// PostgreSQL-backed [`OrderStore`].
#[derive(Clone)]
pub struct PgOrderStore {
    db_pool: DbPool,
}

impl PgOrderStore {
    pub fn new(db_pool: DbPool) -> Self {
        Self { db_pool }
    }
}

/// Takes `quantity` units off a product, but only while that many remain.
/// Concurrent placements serialize on the row lock and re-check the guard.
fn decrement_stock(
    product_id: i32,
    quantity: i32,
) -> impl ExecuteDsl<AsyncPgConnection> + QueryFragment<Pg> + Send + 'static {
    diesel::update(
        produk::table
            .find(product_id)
            .filter(produk::stok.ge(quantity)),
    )
    .set((
        produk::stok.eq(produk::stok - quantity),
        produk::updated_at.eq(diesel::dsl::now),
    ))
}

fn restore_stock(
    product_id: i32,
    quantity: i32,
) -> impl ExecuteDsl<AsyncPgConnection> + QueryFragment<Pg> + Send + 'static {
    diesel::update(produk::table.find(product_id)).set((
        produk::stok.eq(produk::stok + quantity),
        produk::updated_at.eq(diesel::dsl::now),
    ))
}

/// Removes a reservation and yields its `(produkId, jumlah)`, if it existed.
fn take_reservation(
    order_ref: &str,
) -> impl LoadQuery<'_, AsyncPgConnection, (i32, i32)> + QueryFragment<Pg> + Send + '_ {
    diesel::delete(stock_reservations::table.find(order_ref))
        .returning((stock_reservations::produk_id, stock_reservations::jumlah))
}

struct PgPlacementTx<'c> {
    conn: &'c mut AsyncPgConnection,
}

#[async_trait]
impl PlacementTx for PgPlacementTx<'_> {
    async fn find_customer(&mut self, user_id: i32) -> Result<Option<CustomerEntity>> {
        users::table
            .find(user_id)
            .select(CustomerEntity::as_select())
            .first(self.conn)
            .await
            .optional()
            .context("Failed to get user")
    }

    async fn find_product(&mut self, product_id: i32) -> Result<Option<ProductStockEntity>> {
        produk::table
            .find(product_id)
            .select(ProductStockEntity::as_select())
            .first(self.conn)
            .await
            .optional()
            .context("Failed to get product")
    }

    async fn reserve_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
        order_ref: &str,
    ) -> Result<bool> {
        let updated = decrement_stock(product_id, quantity)
            .execute(self.conn)
            .await
            .context("Failed to decrement product stock")?;

        if updated == 0 {
            return Ok(false);
        }

        diesel::insert_into(stock_reservations::table)
            .values(CreateStockReservationEntity {
                order_ref: order_ref.to_string(),
                produk_id: product_id,
                jumlah: quantity,
            })
            .execute(self.conn)
            .await
            .context("Failed to record stock reservation")?;

        Ok(true)
    }

    async fn insert_order(&mut self, order: CreateOrderEntity) -> Result<i32> {
        diesel::insert_into(pemesanan::table)
            .values(order)
            .returning(pemesanan::id)
            .get_result(self.conn)
            .await
            .context("Failed to create order")
    }

    async fn settle_reservation(&mut self, order_ref: &str) -> Result<()> {
        diesel::delete(stock_reservations::table.find(order_ref))
            .execute(self.conn)
            .await
            .context("Failed to settle stock reservation")?;
        Ok(())
    }
}

enum TxError {
    Placement(PlacementFailure),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        TxError::Database(err)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn user_exists(&self, user_id: i32) -> Result<bool> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        diesel::select(diesel::dsl::exists(users::table.find(user_id)))
            .get_result(conn)
            .await
            .context("Failed to look up user")
    }

    async fn place(&self, work: PlacementWork<'_>) -> Result<PlacedOrder, PlacementFailure> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")
            .map_err(PlacementFailure::before_reservation)?;

        let outcome = conn
            .transaction(move |conn| {
                Box::pin(async move {
                    let mut tx = PgPlacementTx { conn };
                    work.run(&mut tx).await.map_err(TxError::Placement)
                })
            })
            .await;

        match outcome {
            Ok(placed) => Ok(placed),
            Err(TxError::Placement(failure)) => Err(failure),
            // Commit or rollback failed, so the decrement may have survived.
            Err(TxError::Database(err)) => Err(PlacementFailure::after_reservation(
                anyhow::Error::new(err).context("Transaction failed"),
            )),
        }
    }

    async fn release_reservation(&self, order_ref: &str) -> Result<Option<i32>> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;
        let order_ref = order_ref.to_string();

        conn.transaction(move |conn| {
            Box::pin(async move {
                let reservation: Option<(i32, i32)> = take_reservation(&order_ref)
                    .get_result(conn)
                    .await
                    .optional()
                    .context("Failed to release stock reservation")?;

                let Some((product_id, quantity)) = reservation else {
                    return Ok(None);
                };

                restore_stock(product_id, quantity)
                    .execute(conn)
                    .await
                    .context("Failed to restore product stock")?;

                Ok::<Option<i32>, anyhow::Error>(Some(quantity))
            })
        })
        .await
    }

    async fn order_history(&self, user_id: i32, page: PageRequest) -> Result<OrderHistoryPage> {
        let conn = &mut self
            .db_pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")?;

        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run(move |conn| {
                Box::pin(async move {
                    let rows: Vec<(OrderEntity, String, Option<String>, Option<String>)> =
                        pemesanan::table
                            .inner_join(produk::table)
                            .left_join(metode_pengiriman::table)
                            .filter(pemesanan::user_id.eq(user_id))
                            .order_by((pemesanan::created_at.desc(), pemesanan::id.desc()))
                            .limit(page.limit)
                            .offset(page.offset())
                            .select((
                                OrderEntity::as_select(),
                                produk::nama,
                                produk::gambar,
                                metode_pengiriman::nama.nullable(),
                            ))
                            .load(conn)
                            .await
                            .context("Failed to get order history")?;

                    let total_items: i64 = pemesanan::table
                        .filter(pemesanan::user_id.eq(user_id))
                        .count()
                        .get_result(conn)
                        .await
                        .context("Failed to count orders")?;

                    let items = rows
                        .into_iter()
                        .map(|(order, nama_produk, gambar_produk, nama_shipping)| {
                            OrderHistoryEntity {
                                order,
                                nama_produk,
                                gambar_produk,
                                nama_shipping,
                            }
                        })
                        .collect();

                    Ok::<OrderHistoryPage, anyhow::Error>(OrderHistoryPage::new(
                        items,
                        page,
                        total_items,
                    ))
                })
            })
            .await
    }
}
