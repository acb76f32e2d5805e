//! # State Module
//!
//! Manages shell state.
//!
//! Instead of one `AppState` struct holding everything, each concern has
//! its own state type and every command takes only the ones it uses.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┼──────────────────┐                        │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌────────────────┐  ┌──────────────────┐             │
//! │  │    Store     │  │ SalesDeskState │  │   ConfigState    │             │
//! │  │              │  │                │  │                  │             │
//! │  │  collections │  │  Arc<Mutex<    │  │  shop_name       │             │
//! │  │  behind one  │  │    Checkout    │  │  low_margin_bps  │             │
//! │  │  lock        │  │  >>            │  │  consumption     │             │
//! │  └──────────────┘  └────────────────┘  └──────────────────┘             │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • Store: single-writer transactions (pincorp-store)                    │
//! │  • SalesDeskState: Protected by Arc<Mutex<T>> for exclusive access      │
//! │  • ConfigState: Read-only after initialization                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod desk;

pub use config::ConfigState;
pub use desk::SalesDeskState;
