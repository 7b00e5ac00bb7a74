//! Outbound integrations with third-party services.

pub mod gateway;
pub mod midtrans;

pub use gateway::{GatewayError, GatewayTransaction, PaymentGateway, TransactionRequest};
pub use midtrans::MidtransClient;
