//! Courier position along the delivery route.
//!
//! Purely cosmetic: nothing here feeds back into status derivation. A GPS-backed
//! [`CourierTracker`] can replace [`SimulatedCourier`] without touching it.

use crate::tracking::DerivedStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub label: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Store to doorstep.
pub const ROUTE: [Waypoint; 6] = [
    Waypoint { label: "Store", lat: 12.9716, lng: 77.5946 },
    Waypoint { label: "Picked Up", lat: 12.9750, lng: 77.5980 },
    Waypoint { label: "On Route", lat: 12.9780, lng: 77.6010 },
    Waypoint { label: "Nearby", lat: 12.9810, lng: 77.6040 },
    Waypoint { label: "Arriving", lat: 12.9840, lng: 77.6070 },
    Waypoint { label: "Delivered", lat: 12.9870, lng: 77.6100 },
];

pub trait CourierTracker: Send + std::fmt::Debug {
    /// Index into the route.
    fn position(&self) -> usize;

    fn waypoint(&self) -> Waypoint;

    /// Called once per courier tick with the status derived at that moment.
    fn tick(&mut self, status: DerivedStatus);

    /// True once the tracker will never move again.
    fn is_frozen(&self) -> bool;
}

/// Walks [`ROUTE`] one waypoint per tick.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCourier {
    position: usize,
    frozen: bool,
}

impl SimulatedCourier {
    pub fn new() -> Self {
        Self::default()
    }

    fn last_index() -> usize {
        ROUTE.len() - 1
    }
}

impl CourierTracker for SimulatedCourier {
    fn position(&self) -> usize {
        self.position
    }

    fn waypoint(&self) -> Waypoint {
        ROUTE[self.position]
    }

    fn tick(&mut self, status: DerivedStatus) {
        if self.frozen {
            return;
        }
        // Delivered and Delayed both mean the promised time has passed.
        if matches!(
            status,
            DerivedStatus::Delivered | DerivedStatus::Delayed | DerivedStatus::Cancelled
        ) {
            tracing::debug!(position = self.position, %status, "Courier frozen");
            self.frozen = true;
            return;
        }
        self.position = (self.position + 1).min(Self::last_index());
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }
}
