//! Generic actor framework backing the order and customer stores.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored resource types implement
//! - [`ResourceActor`] - Generic actor that owns a store of entities
//! - [`ResourceClient`] - Type-safe handle for sending requests to an actor
//! - [`ActorClient`] - Default `get`/`delete` for resource-specific client wrappers
//! - [`FrameworkError`] - Plumbing errors (closed actor, missing id, wrapped entity error)
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::ResourceRequest;
