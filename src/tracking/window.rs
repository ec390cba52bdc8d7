//! Cancellation window and the delivery countdown shown beside it.

use crate::model::{Order, OrderStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// How long after creation an order may still be cancelled.
pub const CANCEL_WINDOW_MIN: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationWindow {
    pub can_cancel: bool,
    pub minutes_remaining: i64,
    pub seconds_remaining: i64,
}

impl CancellationWindow {
    pub fn closed() -> Self {
        Self {
            can_cancel: false,
            minutes_remaining: 0,
            seconds_remaining: 0,
        }
    }
}

pub fn cancel_deadline(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::minutes(CANCEL_WINDOW_MIN)
}

/// True up to and including the deadline. The store applies the same test under its own clock.
pub fn within_cancel_window(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now <= cancel_deadline(created_at)
}

pub fn cancellation_window(
    created_at: DateTime<Utc>,
    persisted: OrderStatus,
    now: DateTime<Utc>,
) -> CancellationWindow {
    if persisted.is_terminal() {
        return CancellationWindow::closed();
    }

    let remaining_ms = (cancel_deadline(created_at) - now).num_milliseconds().max(0);
    CancellationWindow {
        can_cancel: within_cancel_window(created_at, now),
        minutes_remaining: remaining_ms / 60_000,
        seconds_remaining: (remaining_ms % 60_000) / 1_000,
    }
}

/// Time left until the promised delivery, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub minutes: i64,
    pub seconds: i64,
}

impl Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

pub fn delivery_countdown(order: &Order, now: DateTime<Utc>) -> Countdown {
    let remaining_ms = (order.expected_delivery_at() - now).num_milliseconds().max(0);
    Countdown {
        minutes: remaining_ms / 60_000,
        seconds: (remaining_ms % 60_000) / 1_000,
    }
}

/// Share of the promised duration that has elapsed, clamped to `0.0..=100.0`.
pub fn progress_percent(order: &Order, now: DateTime<Utc>) -> f64 {
    let total_ms = i64::from(order.delivery_minutes) * 60_000;
    if total_ms == 0 {
        return 100.0;
    }
    let elapsed_ms = (now - order.created_at).num_milliseconds();
    (elapsed_ms as f64 / total_ms as f64 * 100.0).clamp(0.0, 100.0)
}
