//! # Tracking Session
//!
//! Everything the order tracking page needs, minus the pixels. A session holds one order
//! for one customer and combines the pure pieces of this module (status derivation,
//! cancellation window, timeline, courier) with the side effects they trigger: toasts for
//! the shopper and the out-for-delivery email.
//!
//! A session can be driven by hand (`refresh_status`, `advance_courier`, `cancel`), which
//! is how the tests and the demo binary step through time, or handed to [`spawn`] to run
//! on its own task with two timers:
//!
//! ```rust,ignore
//! let session = TrackingSession::open(orders, &customers, order_id, customer_id, clock, notifier).await?;
//! let mut handle = session.spawn(TrackingIntervals::from_config(&config));
//!
//! while let Some(toast) = handle.next_toast().await {
//!     println!("{}: {}", toast.title, toast.description);
//! }
//! ```
//!
//! [`spawn`]: TrackingSession::spawn

use crate::clients::{CustomerClient, OrderClient};
use crate::config::TrackerConfig;
use crate::framework::ActorClient;
use crate::model::{Contact, CustomerId, Order, OrderId};
use crate::notify::{dispatch, Notification, NotificationKind, Notifier};
use crate::order_actor::OrderError;
use crate::tracking::{
    cancel_deadline, cancellation_window, delivery_countdown, progress_percent, status_of,
    CancellationWindow, Clock, Countdown, CourierTracker, DerivedStatus, SimulatedCourier,
    StatusWatcher, Timeline, Waypoint,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// What the tracking page shows at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingSnapshot {
    pub order_id: OrderId,
    pub reference: String,
    pub taken_at: DateTime<Utc>,
    pub status: DerivedStatus,
    pub timeline: Timeline,
    pub cancellation: CancellationWindow,
    pub countdown: Countdown,
    pub progress_percent: f64,
    pub courier_position: usize,
    pub courier: Waypoint,
}

/// In-app message for a status the shopper has just reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusToast {
    pub status: DerivedStatus,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingIntervals {
    pub status_refresh: Duration,
    pub courier_step: Duration,
}

impl Default for TrackingIntervals {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}

impl TrackingIntervals {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            status_refresh: config.status_refresh,
            courier_step: config.courier_step,
        }
    }
}

pub struct TrackingSession {
    orders: OrderClient,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    customer_id: CustomerId,
    recipient: Contact,
    order: Order,
    watcher: StatusWatcher,
    courier: Box<dyn CourierTracker>,
}

impl TrackingSession {
    /// Loads `order_id` for `customer_id`.
    ///
    /// Fails with [`OrderError::NotFound`] when the order is missing or owned by someone
    /// else. The status at opening is recorded without raising a toast.
    #[instrument(skip(orders, customers, clock, notifier))]
    pub async fn open(
        orders: OrderClient,
        customers: &CustomerClient,
        order_id: OrderId,
        customer_id: CustomerId,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, OrderError> {
        let order = orders.get_order(order_id, customer_id).await?;

        let recipient = match customers.get(customer_id).await {
            Ok(Some(customer)) => customer.contact(),
            Ok(None) => {
                warn!(%customer_id, "Customer profile missing, emails will not be delivered");
                Contact::default()
            }
            Err(e) => {
                warn!(%customer_id, error = %e, "Customer lookup failed");
                Contact::default()
            }
        };

        let mut watcher = StatusWatcher::new();
        let status = status_of(&order, clock.now());
        watcher.observe(status);
        info!(%order_id, %status, "Tracking session opened");

        Ok(Self {
            orders,
            clock,
            notifier,
            customer_id,
            recipient,
            order,
            watcher,
            courier: Box::new(SimulatedCourier::new()),
        })
    }

    /// Replaces the simulated courier, e.g. with a GPS-backed tracker.
    pub fn with_courier(mut self, courier: Box<dyn CourierTracker>) -> Self {
        self.courier = courier;
        self
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn status(&self) -> DerivedStatus {
        status_of(&self.order, self.clock.now())
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        let now = self.clock.now();
        let status = status_of(&self.order, now);
        TrackingSnapshot {
            order_id: self.order.id,
            reference: self.order.id.reference(),
            taken_at: now,
            status,
            timeline: Timeline::for_status(status),
            cancellation: cancellation_window(self.order.created_at, self.order.status, now),
            countdown: delivery_countdown(&self.order, now),
            progress_percent: progress_percent(&self.order, now),
            courier_position: self.courier.position(),
            courier: self.courier.waypoint(),
        }
    }

    /// Re-reads the order from the store and re-derives status. On a change, sends the
    /// status email where one applies and returns the toast for the new status, if it has
    /// one.
    ///
    /// A cancellation made elsewhere is picked up here and ends the session's
    /// progression. When the store cannot be read, the last known order is used.
    pub async fn refresh_status(&mut self) -> Option<StatusToast> {
        self.reload().await;
        let status = self.status();
        let transition = self.watcher.observe(status)?;
        info!(order_id = %self.order.id, from = %transition.from, to = %transition.to, "Status changed");

        if transition.to.sends_email() {
            dispatch(
                self.notifier.clone(),
                Notification::new(
                    &self.order,
                    self.recipient.clone(),
                    NotificationKind::StatusChanged(transition.to),
                ),
            );
        }

        transition.to.message().map(|message| StatusToast {
            status: transition.to,
            title: message.title,
            description: message.description,
        })
    }

    /// One courier tick.
    pub fn advance_courier(&mut self) {
        let status = self.status();
        self.courier.tick(status);
    }

    pub fn courier_frozen(&self) -> bool {
        self.courier.is_frozen()
    }

    /// Cancels the order.
    ///
    /// Refuses locally when the window shown to the shopper is already closed; otherwise
    /// the store makes the decision under its own clock.
    #[instrument(skip(self), fields(order_id = %self.order.id))]
    pub async fn cancel(&mut self) -> Result<Order, OrderError> {
        let now = self.clock.now();
        if !cancellation_window(self.order.created_at, self.order.status, now).can_cancel {
            return Err(if self.order.status.is_terminal() {
                OrderError::AlreadyTerminal {
                    status: self.order.status,
                }
            } else {
                OrderError::WindowExpired {
                    deadline: cancel_deadline(self.order.created_at),
                }
            });
        }

        match self.orders.cancel_order(self.order.id, self.customer_id).await {
            Ok(order) => {
                self.order = order.clone();
                self.watcher.observe(DerivedStatus::Cancelled);
                Ok(order)
            }
            Err(e) => {
                if matches!(e, OrderError::AlreadyTerminal { .. }) {
                    self.reload().await;
                }
                Err(e)
            }
        }
    }

    async fn reload(&mut self) {
        match self.orders.get_order(self.order.id, self.customer_id).await {
            Ok(order) => self.order = order,
            Err(e) => warn!(order_id = %self.order.id, error = %e, "Reload failed"),
        }
    }

    /// Runs the session on its own task until the returned handle is stopped or dropped.
    ///
    /// Status is re-derived every `status_refresh`; the courier moves every
    /// `courier_step` until it freezes. Neither timer fires at start.
    pub fn spawn(mut self, intervals: TrackingIntervals) -> TrackingHandle {
        let (snapshot_tx, snapshots) = watch::channel(self.snapshot());
        let (toast_tx, toasts) = mpsc::channel(16);
        let (commands, mut command_rx) = mpsc::channel::<SessionCommand>(4);

        let task = tokio::spawn(async move {
            let start = Instant::now();
            let mut status_tick =
                interval_at(start + intervals.status_refresh, intervals.status_refresh);
            let mut courier_tick =
                interval_at(start + intervals.courier_step, intervals.courier_step);
            status_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            courier_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = status_tick.tick() => {
                        if let Some(toast) = self.refresh_status().await {
                            if let Err(e) = toast_tx.try_send(toast) {
                                debug!(error = %e, "Toast dropped");
                            }
                        }
                    }
                    _ = courier_tick.tick(), if !self.courier_frozen() => {
                        self.advance_courier();
                    }
                    command = command_rx.recv() => match command {
                        Some(SessionCommand::Cancel { respond_to }) => {
                            let _ = respond_to.send(self.cancel().await);
                        }
                        None => break,
                    },
                }

                if snapshot_tx.send(self.snapshot()).is_err() {
                    break;
                }
            }
            debug!(order_id = %self.order.id, "Tracking session stopped");
        });

        TrackingHandle {
            snapshots,
            toasts,
            commands,
            task,
        }
    }
}

enum SessionCommand {
    Cancel {
        respond_to: oneshot::Sender<Result<Order, OrderError>>,
    },
}

/// Control side of a spawned [`TrackingSession`]. Dropping it stops the session.
pub struct TrackingHandle {
    snapshots: watch::Receiver<TrackingSnapshot>,
    toasts: mpsc::Receiver<StatusToast>,
    commands: mpsc::Sender<SessionCommand>,
    task: JoinHandle<()>,
}

impl TrackingHandle {
    /// The most recent snapshot.
    pub fn snapshot(&self) -> TrackingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<TrackingSnapshot> {
        self.snapshots.clone()
    }

    /// Waits for the next toast. `None` once the session has stopped.
    pub async fn next_toast(&mut self) -> Option<StatusToast> {
        self.toasts.recv().await
    }

    pub async fn cancel(&self) -> Result<Order, OrderError> {
        let (respond_to, response) = oneshot::channel();
        let stopped = || OrderError::StoreUnavailable("tracking session stopped".to_string());
        self.commands
            .send(SessionCommand::Cancel { respond_to })
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())?
    }

    /// Stops both timers and waits for the session task to finish.
    pub async fn stop(self) {
        let TrackingHandle { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            warn!(error = %e, "Tracking session task failed");
        }
    }
}
