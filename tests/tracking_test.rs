use chrono::{DateTime, Duration, TimeZone, Utc};
use order_tracker::config::TrackerConfig;
use order_tracker::lifecycle::OrderSystem;
use order_tracker::model::{
    CustomerCreate, CustomerId, DeliveryAddress, OrderCreate, OrderId, OrderItem, OrderStatus,
};
use order_tracker::notify::{NotificationKind, RecordingNotifier};
use order_tracker::order_actor::OrderError;
use order_tracker::tracking::{
    DerivedStatus, ManualClock, StepState, Timeline, TrackingIntervals, TrackingSession, ROUTE,
};
use std::sync::Arc;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
}

struct Fixture {
    system: OrderSystem,
    clock: Arc<ManualClock>,
    notifier: Arc<RecordingNotifier>,
    customer_id: CustomerId,
    order_id: OrderId,
}

async fn fixture(delivery_minutes: u32) -> Fixture {
    let clock = Arc::new(ManualClock::new(t0()));
    let notifier = Arc::new(RecordingNotifier::new());
    let system = OrderSystem::new(&TrackerConfig::default(), clock.clone(), notifier.clone());

    let customer_id = system
        .customers
        .create_customer(CustomerCreate {
            name: String::new(),
            email: None,
            phone: Some("+91 98450 12345".to_string()),
        })
        .await
        .unwrap();
    let order_id = system
        .orders
        .create_order(OrderCreate {
            customer_id,
            items: vec![OrderItem {
                product_id: 5,
                product_name: "Bananas (6)".to_string(),
                product_image: None,
                platform_name: "Zepto".to_string(),
                platform_price: 48.0,
                platform_delivery_fee: 0.0,
                quantity: 1,
            }],
            total_price: 48.0,
            delivery_fee: 0.0,
            payment_method: "upi".to_string(),
            delivery: DeliveryAddress::default(),
            delivery_minutes: Some(delivery_minutes),
            delivery_estimate: None,
        })
        .await
        .unwrap();

    Fixture {
        system,
        clock,
        notifier,
        customer_id,
        order_id,
    }
}

impl Fixture {
    async fn session(&self) -> TrackingSession {
        self.system
            .open_tracking(self.order_id, self.customer_id)
            .await
            .unwrap()
    }

    fn at(&self, offset: Duration) {
        self.clock.set(t0() + offset);
    }
}

#[tokio::test]
async fn test_thirty_minute_order_walks_every_stage() {
    let f = fixture(30).await;
    let mut session = f.session().await;

    let opened = session.snapshot();
    assert_eq!(opened.status, DerivedStatus::Placed);
    assert!(opened.cancellation.can_cancel);
    assert_eq!(opened.courier_position, 0);
    assert_eq!(opened.courier.label, "Store");
    assert_eq!(opened.countdown.to_string(), "30:00");
    assert_eq!(session.refresh_status().await, None);

    f.at(Duration::minutes(3));
    let toast = session.refresh_status().await.unwrap();
    assert_eq!(toast.status, DerivedStatus::Confirmed);
    assert_eq!(toast.title, "Order Confirmed");
    assert_eq!(session.refresh_status().await, None);

    f.at(Duration::minutes(10));
    let toast = session.refresh_status().await.unwrap();
    assert_eq!(toast.status, DerivedStatus::OutForDelivery);

    // Confirmation email from creation, then the out-for-delivery email.
    let sent = f.notifier.wait_for(2).await;
    assert_eq!(
        sent[1].kind,
        NotificationKind::StatusChanged(DerivedStatus::OutForDelivery)
    );
    assert_eq!(sent[1].recipient.name, "+91 98450 12345");

    f.at(Duration::minutes(30));
    assert_eq!(
        session.refresh_status().await.map(|t| t.status),
        Some(DerivedStatus::Delivered)
    );
    let delivered = session.snapshot();
    assert!(!delivered.cancellation.can_cancel);
    assert_eq!(delivered.progress_percent, 100.0);

    f.at(Duration::minutes(36));
    assert_eq!(
        session.refresh_status().await.map(|t| t.status),
        Some(DerivedStatus::Delayed)
    );
    match session.snapshot().timeline {
        Timeline::Progress { steps, delayed } => {
            assert!(delayed);
            assert_eq!(steps[2].state, StepState::Delayed);
            assert_eq!(steps[2].label, "Delayed");
        }
        Timeline::Cancelled => panic!("order was never cancelled"),
    }

    // Only the out-for-delivery transition sends an email.
    assert_eq!(f.notifier.notifications().len(), 2);
}

#[tokio::test]
async fn test_ten_minute_order_end_to_end() {
    let f = fixture(10).await;
    let mut session = f.session().await;

    // Ten minutes left is already inside the out-for-delivery band.
    let opened = session.snapshot();
    assert_eq!(opened.status, DerivedStatus::OutForDelivery);
    assert!(opened.cancellation.can_cancel);
    assert_eq!(opened.courier_position, 0);

    f.at(Duration::minutes(3));
    session.advance_courier();
    assert_eq!(session.refresh_status().await, None);
    assert_eq!(session.snapshot().courier_position, 1);

    f.at(Duration::minutes(5));
    session.advance_courier();
    let at_five = session.snapshot();
    assert_eq!(at_five.status, DerivedStatus::OutForDelivery);
    assert!(at_five.cancellation.can_cancel);
    assert_eq!(at_five.courier_position, 2);

    f.at(Duration::minutes(10));
    assert_eq!(
        session.refresh_status().await.map(|t| t.status),
        Some(DerivedStatus::Delivered)
    );
    session.advance_courier();
    assert!(session.courier_frozen());
    for minutes in 11..20 {
        f.at(Duration::minutes(minutes));
        session.advance_courier();
    }
    let done = session.snapshot();
    assert!(!done.cancellation.can_cancel);
    assert_eq!(done.courier_position, 2);
    assert!(done.courier_position < ROUTE.len());
}

#[tokio::test]
async fn test_session_cancel() {
    let f = fixture(30).await;
    let mut session = f.session().await;

    f.at(Duration::minutes(1));
    let cancelled = session.cancel().await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, DerivedStatus::Cancelled);
    assert_eq!(snapshot.timeline, Timeline::Cancelled);
    assert!(!snapshot.cancellation.can_cancel);

    f.at(Duration::minutes(15));
    assert_eq!(session.refresh_status().await, None);
    session.advance_courier();
    assert!(session.courier_frozen());

    assert_eq!(
        session.cancel().await,
        Err(OrderError::AlreadyTerminal {
            status: OrderStatus::Cancelled
        })
    );
}

#[tokio::test]
async fn test_session_refuses_locally_after_window() {
    let f = fixture(30).await;
    let mut session = f.session().await;

    f.at(Duration::minutes(6));
    let refused = session.cancel().await;
    assert_eq!(
        refused,
        Err(OrderError::WindowExpired {
            deadline: t0() + Duration::minutes(5)
        })
    );
    let stored = f.system.orders.get_order(f.order_id, f.customer_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Placed);
}

#[tokio::test]
async fn test_stale_session_picks_up_cancellation_from_elsewhere() {
    let f = fixture(30).await;
    let mut session = f.session().await;

    f.at(Duration::minutes(2));
    f.system
        .orders
        .cancel_order(f.order_id, f.customer_id)
        .await
        .unwrap();

    let result = session.cancel().await;
    assert!(matches!(result, Err(OrderError::AlreadyTerminal { .. })));
    assert_eq!(session.order().status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_refresh_follows_a_cancellation_made_elsewhere() {
    let f = fixture(30).await;
    let mut session = f.session().await;

    f.at(Duration::minutes(2));
    f.system
        .orders
        .cancel_order(f.order_id, f.customer_id)
        .await
        .unwrap();

    f.at(Duration::minutes(10));
    assert_eq!(session.refresh_status().await, None);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, DerivedStatus::Cancelled);
    assert_eq!(snapshot.timeline, Timeline::Cancelled);
    assert_eq!(session.order().status, OrderStatus::Cancelled);

    session.advance_courier();
    assert!(session.courier_frozen());

    // Confirmation and cancellation only; no "on the way" email for a cancelled order.
    f.notifier.wait_for(2).await;
    f.at(Duration::minutes(36));
    assert_eq!(session.refresh_status().await, None);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let sent = f.notifier.notifications();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|n| !matches!(n.kind, NotificationKind::StatusChanged(_))));
}

#[tokio::test]
async fn test_session_opened_after_the_promised_time() {
    let f = fixture(30).await;
    f.at(Duration::minutes(40));
    let mut session = f.session().await;
    assert_eq!(session.status(), DerivedStatus::Delayed);

    session.advance_courier();
    session.advance_courier();
    assert!(session.courier_frozen());
    assert_eq!(session.snapshot().courier_position, 0);
}

#[tokio::test]
async fn test_open_is_scoped_to_the_owner() {
    let f = fixture(30).await;
    let result = f.system.open_tracking(f.order_id, CustomerId(77)).await;
    assert!(matches!(result, Err(OrderError::NotFound(_))));
    let result = f.system.open_tracking(OrderId(999), f.customer_id).await;
    assert!(matches!(result, Err(OrderError::NotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_spawned_session_runs_on_timers() {
    let f = fixture(30).await;
    let session = f.session().await;

    let mut handle = session.spawn(TrackingIntervals {
        status_refresh: std::time::Duration::from_secs(5),
        courier_step: std::time::Duration::from_secs(12),
    });
    assert_eq!(handle.snapshot().courier_position, 0);
    assert_eq!(handle.snapshot().status, DerivedStatus::Placed);

    f.at(Duration::minutes(3));
    let toast = handle.next_toast().await.unwrap();
    assert_eq!(toast.status, DerivedStatus::Confirmed);

    tokio::time::sleep(std::time::Duration::from_secs(12)).await;
    assert!(handle.snapshot().courier_position >= 1);

    let cancelled = handle.cancel().await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().status, DerivedStatus::Cancelled);

    handle.stop().await;
    f.system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_handle_stops_the_session() {
    let f = fixture(30).await;
    let handle = f.session().await.spawn(TrackingIntervals::default());
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    drop(handle);

    // The session holds an order client; shutdown only completes once it is gone.
    tokio::time::timeout(std::time::Duration::from_secs(60), f.system.shutdown())
        .await
        .expect("session kept the order actor alive")
        .unwrap();
}

#[tokio::test]
async fn test_snapshot_serializes_for_the_page() {
    let f = fixture(30).await;
    f.at(Duration::minutes(3));
    let session = f.session().await;

    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["status"], "Confirmed");
    assert_eq!(json["order_id"], f.order_id.0);
    assert_eq!(json["cancellation"]["can_cancel"], true);
    assert_eq!(json["cancellation"]["minutes_remaining"], 2);
    assert_eq!(json["timeline"]["Progress"]["delayed"], false);
    assert_eq!(json["timeline"]["Progress"]["steps"][1]["state"], "Current");
    assert_eq!(json["courier"]["label"], "Store");
}
