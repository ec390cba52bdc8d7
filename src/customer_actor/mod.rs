//! # Customer Actor
//!
//! Stores shopper profiles. Orders are checked against it on creation and notifications
//! read their recipient from it.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Customer`]
//! - [`error`] - [`CustomerError`]
//! - [`new()`] - creates the actor and its client
//!
//! The actor has no dependencies, so it runs with `()` as its context:
//!
//! ```rust,ignore
//! let (actor, customers) = customer_actor::new(32);
//! tokio::spawn(actor.run(()));
//! let id = customers.create_customer(params).await?;
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CustomerClient;
use crate::framework::ResourceActor;
use crate::model::Customer;

/// Creates a new Customer actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Customer>, CustomerClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CustomerClient::new(generic_client))
}
