//! # Order Tracking
//!
//! The lifecycle engine. Status, cancellation window, timeline and countdown are pure
//! functions of an order and an instant; [`TrackingSession`] adds the clock, the courier
//! and the side effects on top.

pub mod clock;
pub mod courier;
pub mod history;
pub mod session;
pub mod status;
pub mod timeline;
pub mod watcher;
pub mod window;

pub use clock::*;
pub use courier::*;
pub use history::*;
pub use session::*;
pub use status::*;
pub use timeline::*;
pub use watcher::*;
pub use window::*;
