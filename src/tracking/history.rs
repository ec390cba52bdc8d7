//! A customer's past orders, for the order history screen.

use crate::clients::OrderClient;
use crate::model::{CustomerId, Order};
use crate::tracking::{status_of, Clock, DerivedStatus};
use serde::Serialize;
use tracing::{instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHistoryEntry {
    pub reference: String,
    pub status: DerivedStatus,
    pub item_count: u32,
    pub order: Order,
}

/// Newest first, each with its status as of now.
///
/// A failed read is logged and shown as an empty history.
#[instrument(skip(orders, clock))]
pub async fn order_history(
    orders: &OrderClient,
    customer_id: CustomerId,
    clock: &dyn Clock,
) -> Vec<OrderHistoryEntry> {
    let now = clock.now();
    match orders.list_orders(customer_id).await {
        Ok(list) => list
            .into_iter()
            .map(|order| OrderHistoryEntry {
                reference: order.id.reference(),
                status: status_of(&order, now),
                item_count: order.item_count(),
                order,
            })
            .collect(),
        Err(e) => {
            warn!(%customer_id, error = %e, "Order history unavailable");
            Vec::new()
        }
    }
}
