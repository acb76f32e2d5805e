//! # Commands Module
//!
//! Every operation the shell exposes. The CLI calls these; a UI could call
//! the same functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── materials.rs   ◄─── Material catalog edits
//! ├── boms.rs        ◄─── BOM registry and cost preview
//! ├── production.rs  ◄─── createOrder / setOrderStatus
//! ├── products.rs    ◄─── Selling price and margin
//! ├── customers.rs   ◄─── Customer registry
//! ├── sales.rs       ◄─── Sales desk and recordSale
//! ├── reports.rs     ◄─── Revenue / profit report
//! └── config.rs      ◄─── Configuration retrieval
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the store
//! fn create_order(store: &Store, request: OrderRequest)
//!
//! // Needs store and config
//! fn set_selling_price(store: &Store, config: &ConfigState, ...)
//!
//! // Needs store and desk
//! fn add_to_cart(store: &Store, desk: &SalesDeskState, ...)
//! ```
//!
//! Failures are logged at `warn` here, at the shell boundary, and returned
//! as [`ApiError`](crate::error::ApiError).

pub mod boms;
pub mod config;
pub mod customers;
pub mod materials;
pub mod production;
pub mod products;
pub mod reports;
pub mod sales;

use tracing::warn;

use crate::error::ApiError;

/// Converts a lower-layer error and logs the rejection.
pub(crate) fn rejected<E: Into<ApiError>>(command: &'static str) -> impl FnOnce(E) -> ApiError {
    move |err| {
        let err = err.into();
        warn!(command, code = ?err.code, message = %err.message, "Command rejected");
        err
    }
}
