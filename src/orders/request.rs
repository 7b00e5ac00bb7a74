use serde::Deserialize;
use utoipa::ToSchema;

use super::OrderError;

/// Raw order placement body. Every field is optional at this stage so that
/// missing values can be reported together.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct PlaceOrderRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
    #[serde(rename = "produkId")]
    pub produk_id: Option<i32>,
    pub jumlah: Option<i64>,
    pub total_harga: Option<f64>,
    pub metode_pembayaran: Option<String>,
    #[serde(rename = "shippingId")]
    pub shipping_id: Option<i32>,
    pub catatan: Option<String>,
}

/// Normalized amounts: `total == unit_price * quantity` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub unit_price: i64,
    pub total: i64,
}

impl Pricing {
    /// Derives a whole unit price from the declared total (half rounds up)
    /// and recomputes the total from it, discarding client rounding drift.
    pub fn normalize(declared_total: f64, quantity: i32) -> Result<Self, OrderError> {
        if !declared_total.is_finite() || declared_total <= 0.0 {
            return Err(OrderError::invalid("total_harga must be a positive number"));
        }
        if quantity <= 0 {
            return Err(OrderError::invalid("jumlah must be a positive integer"));
        }

        let unit = (declared_total / f64::from(quantity)).round();
        if unit < 1.0 || unit > i64::MAX as f64 {
            return Err(OrderError::invalid(
                "total_harga is out of range for the requested jumlah",
            ));
        }
        let unit_price = unit as i64;
        let total = unit_price.checked_mul(i64::from(quantity)).ok_or_else(|| {
            OrderError::invalid("total_harga is out of range for the requested jumlah")
        })?;

        Ok(Self { unit_price, total })
    }
}

/// A validated placement request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrderCommand {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub pricing: Pricing,
    pub payment_method: String,
    pub shipping_id: Option<i32>,
    pub note: Option<String>,
}

impl PlaceOrderRequest {
    pub fn validate(self) -> Result<PlaceOrderCommand, OrderError> {
        let payment_method = self
            .metode_pembayaran
            .map(|method| method.trim().to_string())
            .filter(|method| !method.is_empty());

        let mut missing = Vec::new();
        if self.user_id.is_none() {
            missing.push("userId");
        }
        if self.produk_id.is_none() {
            missing.push("produkId");
        }
        if self.jumlah.is_none() {
            missing.push("jumlah");
        }
        if self.total_harga.is_none() {
            missing.push("total_harga");
        }
        if payment_method.is_none() {
            missing.push("metode_pembayaran");
        }

        let (
            Some(user_id),
            Some(product_id),
            Some(jumlah),
            Some(declared_total),
            Some(payment_method),
        ) = (
            self.user_id,
            self.produk_id,
            self.jumlah,
            self.total_harga,
            payment_method,
        )
        else {
            return Err(OrderError::Validation {
                message: format!("Incomplete order data, missing: {}", missing.join(", ")),
                required_fields: missing,
            });
        };

        let quantity = i32::try_from(jumlah)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or_else(|| OrderError::invalid("jumlah must be a positive integer"))?;
        let pricing = Pricing::normalize(declared_total, quantity)?;

        Ok(PlaceOrderCommand {
            user_id,
            product_id,
            quantity,
            pricing,
            payment_method,
            shipping_id: self.shipping_id,
            note: self.catatan.filter(|note| !note.trim().is_empty()),
        })
    }
}
