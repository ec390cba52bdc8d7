use crate::clients::{CustomerClient, OrderClient};
use crate::config::TrackerConfig;
use crate::model::{CustomerId, OrderId};
use crate::notify::{EmailNotifier, Notifier};
use crate::order_actor::{OrderContext, OrderError};
use crate::tracking::{order_history, Clock, OrderHistoryEntry, SystemClock, TrackingSession};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Runtime orchestrator for the order stores.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the Customer and Order actors
/// - **Dependency Wiring**: the Order actor gets the customer client, the store clock and
///   the notifier through its [`OrderContext`]
/// - **Session Wiring**: tracking sessions opened here share the same clock and notifier
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(&TrackerConfig::from_env()?);
///
/// let customer_id = system.customers.create_customer(params).await?;
/// let order_id = system.orders.create_order(order).await?;
/// let session = system.open_tracking(order_id, customer_id).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for the Order actor
    pub orders: OrderClient,

    /// Client for the Customer actor
    pub customers: CustomerClient,

    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,

    /// Order actor first: it holds a customer client that must be released before the
    /// customer actor can stop.
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts the system on the wall clock with the email notifier.
    pub fn start(config: &TrackerConfig) -> Self {
        Self::new(
            config,
            Arc::new(SystemClock),
            Arc::new(EmailNotifier::from_config(config)),
        )
    }

    /// Starts the system with an explicit clock and notifier.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: &TrackerConfig, clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        // 1. Create actors (no dependencies)
        let (customer_actor, customers) = crate::customer_actor::new(config.actor_buffer);
        let (order_actor, orders) = crate::order_actor::new(config.actor_buffer);

        // 2. Start actors with injected context
        let customer_handle = tokio::spawn(customer_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            customers: customers.clone(),
            clock: clock.clone(),
            notifier: notifier.clone(),
        }));
        info!(buffer = config.actor_buffer, "Order system started");

        Self {
            orders,
            customers,
            clock,
            notifier,
            handles: vec![order_handle, customer_handle],
        }
    }

    /// Opens a tracking session on the system's clock and notifier.
    pub async fn open_tracking(
        &self,
        order_id: OrderId,
        customer_id: CustomerId,
    ) -> Result<TrackingSession, OrderError> {
        TrackingSession::open(
            self.orders.clone(),
            &self.customers,
            order_id,
            customer_id,
            self.clock.clone(),
            self.notifier.clone(),
        )
        .await
    }

    pub async fn order_history(&self, customer_id: CustomerId) -> Vec<OrderHistoryEntry> {
        order_history(&self.orders, customer_id, self.clock.as_ref()).await
    }

    /// Gracefully shuts down both actors.
    ///
    /// Drops the system's clients, which closes the request channels, then waits for each
    /// actor task. Returns the first task failure.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down order system...");
        drop(self.orders);
        drop(self.customers);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e);
            }
        }

        info!("Order system shutdown complete.");
        Ok(())
    }
}
