//! Plain data structures; the stored ones implement [`ActorEntity`](crate::framework::ActorEntity).

pub mod customer;
pub mod order;

pub use customer::*;
pub use order::*;
