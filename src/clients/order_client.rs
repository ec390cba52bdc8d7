//! # Order Client
//!
//! High-level API for the Order actor. Every read and write is scoped to the customer
//! making it: an order that belongs to someone else looks exactly like a missing one.

use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{CustomerId, Order, OrderCreate, OrderId, OrderItem, OrderQuery};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use std::cmp::Reverse;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Customer validation and the confirmation email happen in the Order actor's
/// `on_create` hook; the cancellation guard runs in its action handler.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(customer_id = %params.customer_id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?params, "create_order called");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(order_id = %id, reference = %id.reference(), "Order placed");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId, customer_id: CustomerId) -> Result<Order, OrderError> {
        match self.get(id).await? {
            Some(order) if order.customer_id == customer_id => Ok(order),
            _ => Err(OrderError::NotFound(id.to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_order_items(
        &self,
        id: OrderId,
        customer_id: CustomerId,
    ) -> Result<Vec<OrderItem>, OrderError> {
        Ok(self.get_order(id, customer_id).await?.items)
    }

    /// Asks the store to cancel. The store decides; no retry is attempted.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId, customer_id: CustomerId) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, OrderAction::Cancel { customer_id })
            .await
            .map_err(Self::map_error)
    }

    /// The customer's orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, customer_id: CustomerId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .inner
            .list(OrderQuery { customer_id })
            .await
            .map_err(Self::map_error)?;
        orders.sort_by_key(|order| Reverse((order.created_at, order.id.0)));
        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::StoreUnavailable(other.to_string()),
        }
    }
}
