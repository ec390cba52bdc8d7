//! # System Lifecycle
//!
//! Starting, wiring and stopping the store actors.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created first, without dependencies, and receive them when they are run:
//!
//! ```rust,ignore
//! let (customer_actor, customers) = customer_actor::new(buffer);
//! let (order_actor, orders) = order_actor::new(buffer);
//!
//! tokio::spawn(customer_actor.run(()));
//! tokio::spawn(order_actor.run(OrderContext { customers: customers.clone(), clock, notifier }));
//! ```
//!
//! The Order actor holds a clone of the customer client. The graph is acyclic, so each
//! actor stops as soon as the clients pointing at it are dropped.
//!
//! ## Graceful Shutdown
//!
//! 1. Drop the system's clients, closing the request channels.
//! 2. Each actor's `recv()` returns `None` and it logs its final size.
//! 3. Await the actor tasks, order actor first so its customer client is released.
//!
//! Clients cloned out of the system (tracking sessions hold an `OrderClient`) keep their
//! actor alive until they are dropped too.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the compact subscriber; filter with `RUST_LOG`.

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use self::tracing::*;
