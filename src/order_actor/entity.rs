//! [`ActorEntity`] implementation for [`Order`].
//!
//! - Creation validates the payload, stamps `created_at` from the store clock, checks the
//!   customer exists and sends the confirmation email.
//! - Orders are never updated in place (`Update = Infallible`).
//! - [`OrderAction::Cancel`] is the only write after creation. Deletes are refused.

use crate::clients::CustomerClient;
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{Order, OrderCreate, OrderId, OrderQuery, OrderStatus};
use crate::notify::{dispatch, Notification, NotificationKind, Notifier};
use crate::order_actor::{OrderAction, OrderError};
use crate::tracking::{cancel_deadline, within_cancel_window, Clock};
use async_trait::async_trait;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};

/// Dependencies injected into the Order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub customers: CustomerClient,
    /// The store's clock: stamps `created_at` and judges the cancellation window.
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = Infallible;
    type Action = OrderAction;
    type ActionResult = Order;
    type Query = OrderQuery;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(
        id: OrderId,
        params: OrderCreate,
        ctx: &OrderContext,
    ) -> Result<Self, OrderError> {
        validate(&params)?;
        Ok(Order::place(id, params, ctx.clock.now()))
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        self.customer_id == query.customer_id
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let customer = ctx
            .customers
            .get(self.customer_id)
            .await
            .map_err(|e| OrderError::StoreUnavailable(e.to_string()))?
            .ok_or_else(|| OrderError::InvalidCustomer(self.customer_id.to_string()))?;

        dispatch(
            ctx.notifier.clone(),
            Notification::new(self, customer.contact(), NotificationKind::Confirmed),
        );
        Ok(())
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &OrderContext) -> Result<(), OrderError> {
        match update {}
    }

    async fn on_delete(&self, _ctx: &OrderContext) -> Result<(), OrderError> {
        Err(OrderError::NotDeletable(self.id.to_string()))
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<Order, OrderError> {
        match action {
            OrderAction::Cancel { customer_id } => {
                if self.customer_id != customer_id {
                    return Err(OrderError::NotFound(self.id.to_string()));
                }
                if self.status.is_terminal() {
                    return Err(OrderError::AlreadyTerminal {
                        status: self.status,
                    });
                }
                let now = ctx.clock.now();
                if !within_cancel_window(self.created_at, now) {
                    return Err(OrderError::WindowExpired {
                        deadline: cancel_deadline(self.created_at),
                    });
                }

                self.status = OrderStatus::Cancelled;
                self.updated_at = now;
                info!(order_id = %self.id, %customer_id, "Order cancelled");

                send_cancellation_email(ctx, self.clone());
                Ok(self.clone())
            }
        }
    }
}

/// Looks up the recipient off the actor loop, then dispatches.
fn send_cancellation_email(ctx: &OrderContext, order: Order) {
    let customers = ctx.customers.clone();
    let notifier = ctx.notifier.clone();
    tokio::spawn(async move {
        match customers.get(order.customer_id).await {
            Ok(Some(customer)) => {
                let kind = NotificationKind::Cancelled {
                    cancelled_at: order.updated_at,
                };
                dispatch(notifier, Notification::new(&order, customer.contact(), kind));
            }
            Ok(None) => warn!(order_id = %order.id, "Customer gone, cancellation email skipped"),
            Err(e) => warn!(order_id = %order.id, error = %e, "Customer lookup failed"),
        }
    });
}

fn validate(params: &OrderCreate) -> Result<(), OrderError> {
    if params.items.is_empty() {
        return Err(OrderError::Validation("an order needs at least one item".to_string()));
    }
    if let Some(item) = params.items.iter().find(|item| item.quantity == 0) {
        return Err(OrderError::Validation(format!(
            "quantity for {} must be positive",
            item.product_name
        )));
    }
    if params.delivery_minutes == Some(0) {
        return Err(OrderError::Validation("delivery_minutes must be positive".to_string()));
    }
    for (field, amount) in [
        ("total_price", params.total_price),
        ("delivery_fee", params.delivery_fee),
    ] {
        if !amount.is_finite() || amount < 0.0 {
            return Err(OrderError::Validation(format!(
                "{field} must be a non-negative amount, got {amount}"
            )));
        }
    }
    Ok(())
}
