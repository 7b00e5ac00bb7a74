use std::sync::Arc;

use jsonwebtoken::DecodingKey;

use crate::orders::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub jwt_key: DecodingKey,
}

impl AppState {
    pub fn new(orders: OrderService, jwt_secret: &str) -> Self {
        Self {
            orders: Arc::new(orders),
            jwt_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}
