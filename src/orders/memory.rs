//! In-memory [`OrderStore`] for tests. Placements run against a staged copy
//! of the state that is swapped in on success, which mirrors a database
//! transaction. Faults can be injected to exercise the failure paths.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    OrderStore, PlacedOrder, PlacementFailure, PlacementTx, PlacementWork,
    history::{OrderHistoryPage, PageRequest},
};
use crate::models::{
    CreateOrderEntity, CustomerEntity, OrderEntity, OrderHistoryEntity, ProductStockEntity,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    /// Inserting the order row fails.
    FailInsert,
    /// A failed placement keeps its writes, as if the decrement had been
    /// committed outside the transaction.
    KeepChangesOnFailure,
    /// The compensating release fails.
    FailRelease,
    /// Product lookups report this stock level instead of the real one.
    StaleStockRead(i32),
}

#[derive(Debug, Clone)]
struct ProductRow {
    nama: String,
    stok: i32,
    gambar: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: HashMap<i32, CustomerEntity>,
    products: HashMap<i32, ProductRow>,
    shipping: HashMap<i32, String>,
    orders: Vec<OrderEntity>,
    reservations: BTreeMap<String, (i32, i32)>,
    next_order_id: i32,
    last_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<StoreState>,
    faults: Mutex<Vec<StoreFault>>,
    tx_lock: tokio::sync::Mutex<()>,
    place_calls: AtomicUsize,
    release_calls: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<Inner>,
}

impl MemoryOrderStore {
    pub fn add_user(&self, id: i32, nama: &str, email: &str, no_hp: Option<&str>) {
        self.state().users.insert(
            id,
            CustomerEntity {
                nama: nama.to_string(),
                email: email.to_string(),
                no_hp: no_hp.map(str::to_string),
            },
        );
    }

    pub fn add_product(&self, id: i32, nama: &str, stok: i32, gambar: Option<&str>) {
        self.state().products.insert(
            id,
            ProductRow {
                nama: nama.to_string(),
                stok,
                gambar: gambar.map(str::to_string),
            },
        );
    }

    pub fn add_shipping(&self, id: i32, nama: &str) {
        self.state().shipping.insert(id, nama.to_string());
    }

    pub fn inject(&self, fault: StoreFault) {
        self.inner.faults.lock().unwrap().push(fault);
    }

    pub fn stock(&self, product_id: i32) -> Option<i32> {
        self.state().products.get(&product_id).map(|product| product.stok)
    }

    pub fn orders(&self) -> Vec<OrderEntity> {
        self.state().orders.clone()
    }

    pub fn outstanding_reservations(&self) -> Vec<String> {
        self.state().reservations.keys().cloned().collect()
    }

    pub fn place_calls(&self) -> usize {
        self.inner.place_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.inner.release_calls.load(Ordering::SeqCst)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.inner.state.lock().unwrap()
    }

    fn faults(&self) -> Vec<StoreFault> {
        self.inner.faults.lock().unwrap().clone()
    }

    fn has_fault(&self, fault: StoreFault) -> bool {
        self.faults().contains(&fault)
    }
}

struct MemoryTx<'a> {
    state: &'a mut StoreState,
    faults: Vec<StoreFault>,
}

#[async_trait]
impl PlacementTx for MemoryTx<'_> {
    async fn find_customer(&mut self, user_id: i32) -> Result<Option<CustomerEntity>> {
        Ok(self.state.users.get(&user_id).cloned())
    }

    async fn find_product(&mut self, product_id: i32) -> Result<Option<ProductStockEntity>> {
        let stale = self.faults.iter().find_map(|fault| match fault {
            StoreFault::StaleStockRead(stok) => Some(*stok),
            _ => None,
        });

        Ok(self
            .state
            .products
            .get(&product_id)
            .map(|product| ProductStockEntity {
                nama: product.nama.clone(),
                stok: stale.unwrap_or(product.stok),
            }))
    }

    async fn reserve_stock(
        &mut self,
        product_id: i32,
        quantity: i32,
        order_ref: &str,
    ) -> Result<bool> {
        match self.state.products.get_mut(&product_id) {
            Some(product) if product.stok >= quantity => {
                product.stok -= quantity;
                self.state
                    .reservations
                    .insert(order_ref.to_string(), (product_id, quantity));
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_order(&mut self, order: CreateOrderEntity) -> Result<i32> {
        if self.faults.contains(&StoreFault::FailInsert) {
            return Err(anyhow!("Failed to create order: connection reset"));
        }

        self.state.next_order_id += 1;
        let id = self.state.next_order_id;
        let now = self
            .state
            .last_created_at
            .map_or_else(Utc::now, |last| last.max(Utc::now()));
        self.state.last_created_at = Some(now);

        self.state.orders.push(OrderEntity {
            id,
            user_id: order.user_id,
            produk_id: order.produk_id,
            jumlah: order.jumlah,
            total_harga: order.total_harga,
            metode_pembayaran: order.metode_pembayaran,
            shipping_id: order.shipping_id,
            catatan: order.catatan,
            midtrans_order_id: order.midtrans_order_id,
            midtrans_transaction_token: order.midtrans_transaction_token,
            status_pembayaran: order.status_pembayaran,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn settle_reservation(&mut self, order_ref: &str) -> Result<()> {
        self.state.reservations.remove(order_ref);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn user_exists(&self, user_id: i32) -> Result<bool> {
        Ok(self.state().users.contains_key(&user_id))
    }

    async fn place(&self, work: PlacementWork<'_>) -> Result<PlacedOrder, PlacementFailure> {
        self.inner.place_calls.fetch_add(1, Ordering::SeqCst);
        let _serialized = self.inner.tx_lock.lock().await;

        let mut staged = self.state().clone();
        let mut tx = MemoryTx {
            state: &mut staged,
            faults: self.faults(),
        };
        let outcome = work.run(&mut tx).await;

        if outcome.is_ok() || self.has_fault(StoreFault::KeepChangesOnFailure) {
            *self.state() = staged;
        }
        outcome
    }

    async fn release_reservation(&self, order_ref: &str) -> Result<Option<i32>> {
        self.inner.release_calls.fetch_add(1, Ordering::SeqCst);
        let _serialized = self.inner.tx_lock.lock().await;

        if self.has_fault(StoreFault::FailRelease) {
            return Err(anyhow!("Failed to release reservation: database unavailable"));
        }

        let mut state = self.state();
        let Some((product_id, quantity)) = state.reservations.remove(order_ref) else {
            return Ok(None);
        };
        if let Some(product) = state.products.get_mut(&product_id) {
            product.stok += quantity;
        }
        Ok(Some(quantity))
    }

    async fn order_history(&self, user_id: i32, page: PageRequest) -> Result<OrderHistoryPage> {
        let state = self.state();

        let mut orders: Vec<&OrderEntity> = state
            .orders
            .iter()
            .filter(|order| order.user_id == user_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total_items = orders.len() as i64;

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
        let items = orders
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|order| {
                let product = state.products.get(&order.produk_id)?;
                Some(OrderHistoryEntity {
                    order: order.clone(),
                    nama_produk: product.nama.clone(),
                    gambar_produk: product.gambar.clone(),
                    nama_shipping: order
                        .shipping_id
                        .and_then(|id| state.shipping.get(&id).cloned()),
                })
            })
            .collect();

        Ok(OrderHistoryPage::new(items, page, total_items))
    }
}
