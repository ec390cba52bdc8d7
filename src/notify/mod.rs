//! # Notifications
//!
//! Best-effort messages to the shopper about their order. A send never blocks or fails
//! the operation that triggered it: callers go through [`dispatch`], which runs the send
//! on its own task and logs the outcome.
//!
//! - [`EmailNotifier`] renders the transactional emails and hands them to a simulated
//!   transport.
//! - [`RecordingNotifier`] keeps every notification in memory for tests, and can be told
//!   to fail.

pub mod email;
pub mod error;
pub mod recording;

pub use email::*;
pub use error::*;
pub use recording::*;

use crate::model::{Contact, Order, OrderId};
use crate::tracking::DerivedStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    /// Sent once after the order is stored.
    Confirmed,
    StatusChanged(DerivedStatus),
    Cancelled { cancelled_at: DateTime<Utc> },
}

/// The order details an email needs, copied out of the order at send time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub reference: String,
    pub total_price: f64,
    pub delivery_fee: f64,
    pub grand_total: f64,
    pub payment_method: String,
    pub delivery_estimate: Option<String>,
    pub address: Option<String>,
    pub lines: Vec<SummaryLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub product_name: String,
    pub platform_name: String,
    pub quantity: u32,
    pub line_total: f64,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        let address = [&order.delivery.address, &order.delivery.city, &order.delivery.pin_code]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .cloned()
            .collect::<Vec<_>>();
        Self {
            reference: order.id.reference(),
            total_price: order.total_price,
            delivery_fee: order.delivery_fee,
            grand_total: order.grand_total,
            payment_method: order.payment_method.clone(),
            delivery_estimate: order.delivery_estimate.clone(),
            address: (!address.is_empty()).then(|| address.join(", ")),
            lines: order
                .items
                .iter()
                .map(|item| SummaryLine {
                    product_name: item.product_name.clone(),
                    platform_name: item.platform_name.clone(),
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub order_id: OrderId,
    pub kind: NotificationKind,
    pub recipient: Contact,
    pub summary: OrderSummary,
}

impl Notification {
    pub fn new(order: &Order, recipient: Contact, kind: NotificationKind) -> Self {
        Self {
            order_id: order.id,
            kind,
            recipient,
            summary: OrderSummary::from(order),
        }
    }
}

/// Sends `notification` on a background task. Failures are logged, never returned.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) -> JoinHandle<()> {
    tokio::spawn(async move {
        let order_id = notification.order_id;
        match notifier.notify(&notification).await {
            Ok(()) => info!(%order_id, kind = ?notification.kind, "Notification sent"),
            Err(e) => warn!(%order_id, kind = ?notification.kind, error = %e, "Notification failed"),
        }
    })
}
