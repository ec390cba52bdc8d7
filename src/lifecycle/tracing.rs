//! # Observability & Tracing
//!
//! Structured logging for the whole system, configured from `RUST_LOG`.
//!
//! Actors log with an `entity_type` field instead of a module path, so the target is
//! hidden (`with_target(false)`) and the compact format keeps spans inline:
//!
//! ```text
//! INFO Actor started entity_type="Customer"
//! INFO Created entity_type="Customer" id=customer_1 size=1
//! INFO create_order{customer_id=customer_1}: Order placed order_id=order_1 reference="00000001"
//! INFO Notification sent order_id=order_1 kind=Confirmed
//! INFO Status changed order_id=order_1 from=Placed to=Confirmed
//! INFO cancel_order{id=OrderId(1) customer_id=CustomerId(1)}: Action ok entity_type="Order" id=order_1
//! ```
//!
//! `RUST_LOG=debug` adds full request payloads (`Create params=OrderCreate { .. }`) and
//! rendered emails.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=order_tracker::tracking=debug cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Defaults to `info` when `RUST_LOG` is unset.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
