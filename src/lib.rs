//! OrderScope: analytics over an e-commerce orders/payments dataset
//!
//! This library loads a pre-joined flat CSV of orders and payments, filters it
//! by an inclusive purchase-date range, and derives the dashboard tables:
//! daily order counts, payment-type popularity, order-status breakdown, daily
//! revenue for delivered orders, and per-customer RFM metrics.

pub mod agg;
pub mod cli;
pub mod data;
pub mod session;
pub mod viz;

// Re-export public items for easier access
pub use agg::{DateRange, RfmRow};
pub use cli::Args;
pub use data::{load_dataset, Dataset, Order, Payment};
pub use session::{Session, Snapshot};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
