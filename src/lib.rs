//! # Order Tracker
//!
//! > **Order lifecycle for a grocery price-comparison app: time-derived status, a bounded
//! > cancellation window and a simulated courier, on top of resource-oriented actors.**
//!
//! An order is written twice at most: once as `Placed` when it is created, and once as
//! `Cancelled` if the shopper cancels inside the five-minute window. Every stage a shopper
//! watches in between (Confirmed, Out for Delivery, Delivered, Delayed) is derived from the
//! creation time, the promised delivery duration and the current time.
//!
//! ## Architecture Notes
//!
//! ### 1. Actors as Stores
//! Customers and orders each live in a generic [`ResourceActor`](framework::ResourceActor)
//! that processes requests one at a time. The cancellation guard runs inside the Order
//! actor's action handler, so concurrent cancels of one order are serialized: exactly one
//! wins.
//!
//! ### 2. Type-Safe Error Handling
//! Each actor defines its own error type ([`CustomerError`](customer_actor::CustomerError),
//! [`OrderError`](order_actor::OrderError)). Entity errors cross the actor boundary boxed
//! inside [`FrameworkError`](framework::FrameworkError) and are downcast back to the typed
//! error by the clients, so callers can match on `WindowExpired` or `AlreadyTerminal`.
//!
//! ### 3. Injected Time
//! All status and window logic reads time through [`Clock`](tracking::Clock). The Order
//! actor gets the store clock through its context; tests and the demo use
//! [`ManualClock`](tracking::ManualClock).
//!
//! ### 4. Observability
//! `tracing` everywhere, with structured fields (`entity_type`, `order_id`, `error`).
//! See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `ResourceActor<T>`, its client, and the `MockClient` used in tests.
//!
//! ### 2. The Stores ([`customer_actor`], [`order_actor`], [`clients`])
//! Concrete [`ActorEntity`](framework::ActorEntity) implementations and the typed clients
//! that wrap them.
//!
//! ### 3. The Lifecycle Engine ([`tracking`])
//! Status derivation, cancellation window, timeline, courier simulation, notification
//! dedup and the [`TrackingSession`](tracking::TrackingSession) that ties them together.
//!
//! ### 4. Side Effects ([`notify`])
//! Fire-and-forget order emails.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`OrderSystem`](lifecycle::OrderSystem) wires actors, clock and notifier together;
//! [`TrackerConfig`](config::TrackerConfig) reads `TRACKER_*` settings.
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod tracking;
