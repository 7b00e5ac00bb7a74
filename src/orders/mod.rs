//! Order placement and order history.
//!
//! A placement validates the request, then runs [`PlacementWork`] inside one
//! store transaction: customer and product lookup, conditional stock
//! decrement recorded in the reservation ledger, payment gateway call, order
//! insert. When anything after the decrement fails, [`OrderService`] asks the
//! store to release the reservation; the release only gives stock back if the
//! ledger row outlived the rollback.

mod error;
pub mod history;
#[cfg(test)]
pub mod memory;
pub mod pg;
mod placement;
pub mod reference;
mod request;
mod service;
mod store;

pub use error::{OrderError, PlacementFailure};
pub use history::{HistoryQuery, OrderHistoryPage, PageRequest};
pub use pg::PgOrderStore;
pub use placement::{PlacedOrder, PlacementWork};
pub use request::{PlaceOrderCommand, PlaceOrderRequest, Pricing};
pub use service::OrderService;
pub use store::{OrderStore, PlacementTx};
