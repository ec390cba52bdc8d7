use crate::model::CustomerId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Promised delivery duration used when the checkout does not supply one.
pub const DEFAULT_DELIVERY_MINUTES: u32 = 30;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl OrderId {
    /// Short reference shown to shoppers and used in email subjects.
    pub fn reference(&self) -> String {
        format!("{:08X}", self.0)
    }
}

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Status as written to the order store.
///
/// Only `Placed` (on insert) and `Cancelled` (on cancellation) are ever written here;
/// the intermediate stages are derived from time, see
/// [`derive_status`](crate::tracking::derive_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Confirmed,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// No further writes are accepted once an order reaches one of these.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub address: Option<String>,
    pub city: Option<String>,
    pub pin_code: Option<String>,
}

/// One line of an order, frozen at checkout.
///
/// Catalog edits after the order was placed never reach these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: u32,
    pub product_name: String,
    pub product_image: Option<String>,
    pub platform_name: String,
    pub platform_price: f64,
    pub platform_delivery_fee: f64,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.platform_price * f64::from(self.quantity)
    }
}

/// Represents a customer order and the item snapshot taken when it was placed.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Custom actions ([`OrderAction`](crate::order_actor::OrderAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivery_minutes: u32,
    pub delivery_estimate: Option<String>,
    pub status: OrderStatus,
    pub total_price: f64,
    pub delivery_fee: f64,
    pub grand_total: f64,
    pub payment_method: String,
    pub delivery: DeliveryAddress,
    pub items: Vec<OrderItem>,
}

/// Payload for placing a new order.
///
/// `grand_total` is not part of the payload: the store computes it from the two amounts.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub delivery_fee: f64,
    pub payment_method: String,
    pub delivery: DeliveryAddress,
    /// Falls back to [`DEFAULT_DELIVERY_MINUTES`].
    pub delivery_minutes: Option<u32>,
    pub delivery_estimate: Option<String>,
}

/// Filter for listing orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuery {
    pub customer_id: CustomerId,
}

impl Order {
    /// Builds a freshly placed order stamped at `created_at`.
    pub fn place(id: OrderId, params: OrderCreate, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_id: params.customer_id,
            created_at,
            updated_at: created_at,
            delivery_minutes: params.delivery_minutes.unwrap_or(DEFAULT_DELIVERY_MINUTES),
            delivery_estimate: params.delivery_estimate,
            status: OrderStatus::Placed,
            total_price: params.total_price,
            delivery_fee: params.delivery_fee,
            grand_total: params.total_price + params.delivery_fee,
            payment_method: params.payment_method,
            delivery: params.delivery,
            items: params.items,
        }
    }

    /// When the order was promised to arrive.
    pub fn expected_delivery_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(i64::from(self.delivery_minutes))
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
