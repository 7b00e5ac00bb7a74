use chrono::{DateTime, Utc};
use diesel::{
    Selectable,
    prelude::{Insertable, Queryable},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Users

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CustomerEntity {
    pub nama: String,
    pub email: String,
    pub no_hp: Option<String>,
}

// Products

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::produk)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductStockEntity {
    pub nama: String,
    pub stok: i32,
}

// Orders

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::pemesanan)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderEntity {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "produkId")]
    pub produk_id: i32,
    pub jumlah: i32,
    pub total_harga: i64,
    pub metode_pembayaran: String,
    #[serde(rename = "shippingId")]
    pub shipping_id: Option<i32>,
    pub catatan: Option<String>,
    pub midtrans_order_id: String,
    pub midtrans_transaction_token: String,
    pub status_pembayaran: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::pemesanan)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreateOrderEntity {
    pub user_id: i32,
    pub produk_id: i32,
    pub jumlah: i32,
    pub total_harga: i64,
    pub metode_pembayaran: String,
    pub shipping_id: Option<i32>,
    pub catatan: Option<String>,
    pub midtrans_order_id: String,
    pub midtrans_transaction_token: String,
    pub status_pembayaran: String,
}

/// One row of a user's order history: the order joined to its product and,
/// when it still exists, its shipping method.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderHistoryEntity {
    #[serde(flatten)]
    pub order: OrderEntity,
    pub nama_produk: String,
    pub gambar_produk: Option<String>,
    pub nama_shipping: Option<String>,
}

// Stock reservations

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::stock_reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreateStockReservationEntity {
    pub order_ref: String,
    pub produk_id: i32,
    pub jumlah: i32,
}

/// Lifecycle of an order's payment. Only `Pending` is written by this
/// service; the other states are reached through gateway notifications.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}
