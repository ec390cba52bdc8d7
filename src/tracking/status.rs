//! Time-derived order status.
//!
//! The store only ever writes `Placed` and `Cancelled`. Everything a shopper sees in
//! between is computed here from the creation instant, the promised duration and the
//! current time.

use crate::model::{Order, OrderStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Minutes after creation at which a placed order counts as confirmed.
pub const CONFIRM_AFTER_MIN: i64 = 2;
/// An order is out for delivery once at most this many minutes remain.
pub const OUT_FOR_DELIVERY_WITHIN_MIN: i64 = 20;
/// Minutes past the promised time still reported as `Delivered`.
pub const DELAY_GRACE_MINUTES: i64 = 5;

/// Display status. Variants are declared in progression order, so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DerivedStatus {
    Placed,
    Confirmed,
    OutForDelivery,
    Delivered,
    Delayed,
    Cancelled,
}

/// Title and body of the in-app toast raised when a status is first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessage {
    pub title: &'static str,
    pub description: &'static str,
}

impl DerivedStatus {
    pub fn label(self) -> &'static str {
        match self {
            DerivedStatus::Placed => "Placed",
            DerivedStatus::Confirmed => "Confirmed",
            DerivedStatus::OutForDelivery => "Out for Delivery",
            DerivedStatus::Delivered => "Delivered",
            DerivedStatus::Delayed => "Delayed",
            DerivedStatus::Cancelled => "Cancelled",
        }
    }

    /// `None` for statuses that never raise a toast.
    pub fn message(self) -> Option<StatusMessage> {
        let (title, description) = match self {
            DerivedStatus::Confirmed => (
                "Order Confirmed",
                "Your order has been confirmed and is being prepared!",
            ),
            DerivedStatus::OutForDelivery => ("Out for Delivery", "Your order is on the way!"),
            DerivedStatus::Delivered => ("Delivered!", "Enjoy your order!"),
            DerivedStatus::Delayed => (
                "Delivery Delayed",
                "Your delivery is taking longer than expected. Please wait.",
            ),
            DerivedStatus::Placed | DerivedStatus::Cancelled => return None,
        };
        Some(StatusMessage { title, description })
    }

    /// Whether reaching this status sends the status email.
    pub fn sends_email(self) -> bool {
        self == DerivedStatus::OutForDelivery
    }

    /// Position on the four-step timeline. `Delayed` sits on the out-for-delivery step.
    pub fn timeline_index(self) -> Option<usize> {
        match self {
            DerivedStatus::Placed => Some(0),
            DerivedStatus::Confirmed => Some(1),
            DerivedStatus::OutForDelivery | DerivedStatus::Delayed => Some(2),
            DerivedStatus::Delivered => Some(3),
            DerivedStatus::Cancelled => None,
        }
    }
}

impl Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Computes the display status of an order at `now`.
///
/// Pure: identical inputs always give identical output. Comparisons are made on whole
/// milliseconds.
pub fn derive_status(
    created_at: DateTime<Utc>,
    delivery_minutes: u32,
    persisted: OrderStatus,
    now: DateTime<Utc>,
) -> DerivedStatus {
    if persisted == OrderStatus::Cancelled {
        return DerivedStatus::Cancelled;
    }

    let expected = created_at + Duration::minutes(i64::from(delivery_minutes));
    let elapsed_ms = (now - created_at).num_milliseconds();
    let remaining_ms = (expected - now).num_milliseconds();

    if remaining_ms <= 0 {
        if remaining_ms < -minutes_ms(DELAY_GRACE_MINUTES) {
            DerivedStatus::Delayed
        } else {
            DerivedStatus::Delivered
        }
    } else if remaining_ms <= minutes_ms(OUT_FOR_DELIVERY_WITHIN_MIN) {
        DerivedStatus::OutForDelivery
    } else if elapsed_ms >= minutes_ms(CONFIRM_AFTER_MIN) {
        DerivedStatus::Confirmed
    } else {
        DerivedStatus::Placed
    }
}

/// [`derive_status`] for a stored order.
pub fn status_of(order: &Order, now: DateTime<Utc>) -> DerivedStatus {
    derive_status(order.created_at, order.delivery_minutes, order.status, now)
}

fn minutes_ms(minutes: i64) -> i64 {
    minutes * 60_000
}
