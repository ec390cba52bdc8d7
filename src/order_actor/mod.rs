//! # Order Actor
//!
//! Stores orders and owns the one write this system makes after creation: cancellation.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`Order`], plus its [`OrderContext`]
//! - [`actions`] - [`OrderAction`]
//! - [`error`] - [`OrderError`]
//! - [`new()`] - creates the actor and its client
//!
//! ## Dependencies
//!
//! The order actor reads customers (to validate ownership and address emails), the store
//! clock, and a notifier, all injected through [`OrderContext`] when the actor is run:
//!
//! ```rust,ignore
//! let (customer_actor, customers) = customer_actor::new(32);
//! let (order_actor, orders) = order_actor::new(32);
//! tokio::spawn(customer_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext {
//!     customers: customers.clone(),
//!     clock: Arc::new(SystemClock),
//!     notifier,
//! }));
//! ```
//!
//! ## Cancellation
//!
//! The actor handles one request at a time, so the check-then-write in
//! [`OrderAction::Cancel`] cannot interleave with another cancel of the same order. Of any
//! number of concurrent cancels, one succeeds and the rest see
//! [`OrderError::AlreadyTerminal`].

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::Order;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
