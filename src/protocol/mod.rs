//! Controller-facing order protocol.
//!
//! Controllers exchange orders as loose string tokens; this module maps them
//! onto the typed orders the resolver understands and back again.

pub mod orders;

pub use orders::{format_orders, parse_orders, parse_projectile_action, OrderTokenError, RawOrders};
