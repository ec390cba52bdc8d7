use chrono::{DateTime, Duration, TimeZone, Utc};
use order_tracker::config::TrackerConfig;
use order_tracker::customer_actor::CustomerError;
use order_tracker::framework::ActorClient;
use order_tracker::lifecycle::OrderSystem;
use order_tracker::model::{
    CustomerCreate, CustomerId, CustomerUpdate, DeliveryAddress, OrderCreate, OrderItem,
    OrderStatus,
};
use order_tracker::notify::{NotificationKind, RecordingNotifier};
use order_tracker::order_actor::OrderError;
use order_tracker::tracking::{DerivedStatus, ManualClock};
use std::sync::Arc;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
}

fn system() -> (OrderSystem, Arc<ManualClock>, Arc<RecordingNotifier>) {
    let clock = Arc::new(ManualClock::new(t0()));
    let notifier = Arc::new(RecordingNotifier::new());
    let system = OrderSystem::new(&TrackerConfig::default(), clock.clone(), notifier.clone());
    (system, clock, notifier)
}

async fn customer(system: &OrderSystem, name: &str) -> CustomerId {
    system
        .customers
        .create_customer(CustomerCreate {
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
        })
        .await
        .unwrap()
}

fn order(customer_id: CustomerId, delivery_minutes: u32) -> OrderCreate {
    OrderCreate {
        customer_id,
        items: vec![
            OrderItem {
                product_id: 1,
                product_name: "Onions 1kg".to_string(),
                product_image: None,
                platform_name: "Blinkit".to_string(),
                platform_price: 38.0,
                platform_delivery_fee: 0.0,
                quantity: 3,
            },
            OrderItem {
                product_id: 2,
                product_name: "Paneer 200g".to_string(),
                product_image: None,
                platform_name: "BigBasket".to_string(),
                platform_price: 90.0,
                platform_delivery_fee: 30.0,
                quantity: 1,
            },
        ],
        total_price: 204.0,
        delivery_fee: 30.0,
        payment_method: "cod".to_string(),
        delivery: DeliveryAddress {
            address: Some("4th Cross, Indiranagar".to_string()),
            city: Some("Bengaluru".to_string()),
            pin_code: Some("560038".to_string()),
        },
        delivery_minutes: Some(delivery_minutes),
        delivery_estimate: None,
    }
}

#[tokio::test]
async fn test_full_order_system_integration() {
    let (system, clock, notifier) = system();
    let asha = customer(&system, "Asha").await;
    let ravi = customer(&system, "Ravi").await;

    let first = system.orders.create_order(order(asha, 30)).await.unwrap();
    clock.advance(Duration::minutes(1));
    let second = system.orders.create_order(order(asha, 45)).await.unwrap();
    system.orders.create_order(order(ravi, 30)).await.unwrap();

    let stored = system.orders.get_order(first, asha).await.unwrap();
    assert_eq!(stored.customer_id, asha);
    assert_eq!(stored.created_at, t0());
    assert_eq!(stored.grand_total, 234.0);

    let items = system.orders.get_order_items(first, asha).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].product_name, "Paneer 200g");
    assert!(matches!(
        system.orders.get_order_items(first, ravi).await,
        Err(OrderError::NotFound(_))
    ));

    let listed = system.orders.list_orders(asha).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![second, first]);

    // Three confirmation emails, one per order.
    let sent = notifier.wait_for(3).await;
    assert!(sent.iter().all(|n| n.kind == NotificationKind::Confirmed));

    clock.advance(Duration::minutes(2));
    let history = system.order_history(asha).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].order.id, second);
    assert_eq!(history[0].status, DerivedStatus::Confirmed);
    assert_eq!(history[1].status, DerivedStatus::Confirmed);
    assert_eq!(history[1].item_count, 4);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_cancels_exactly_one_wins() {
    let (system, clock, _notifier) = system();
    let asha = customer(&system, "Asha").await;
    let id = system.orders.create_order(order(asha, 30)).await.unwrap();
    clock.advance(Duration::minutes(2));

    let attempts: Vec<_> = (0..10)
        .map(|_| {
            let orders = system.orders.clone();
            tokio::spawn(async move { orders.cancel_order(id, asha).await })
        })
        .collect();

    let mut wins = 0;
    let mut refused = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(order) => {
                assert_eq!(order.status, OrderStatus::Cancelled);
                wins += 1;
            }
            Err(OrderError::AlreadyTerminal { status }) => {
                assert_eq!(status, OrderStatus::Cancelled);
                refused += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!((wins, refused), (1, 9));

    let stored = system.orders.get_order(id, asha).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Cancelled);
    assert_eq!(stored.updated_at, t0() + Duration::minutes(2));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cancellation_email_and_history_status() {
    let (system, clock, notifier) = system();
    let asha = customer(&system, "Asha").await;
    let id = system.orders.create_order(order(asha, 30)).await.unwrap();

    clock.advance(Duration::minutes(4));
    system.orders.cancel_order(id, asha).await.unwrap();

    let sent = notifier.wait_for(2).await;
    assert_eq!(
        sent[1].kind,
        NotificationKind::Cancelled {
            cancelled_at: t0() + Duration::minutes(4)
        }
    );
    assert_eq!(sent[1].recipient.name, "Asha");

    // Cancelled wins over elapsed time forever after.
    clock.advance(Duration::hours(3));
    let history = system.order_history(asha).await;
    assert_eq!(history[0].status, DerivedStatus::Cancelled);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_customer_store() {
    let (system, _clock, _notifier) = system();
    let id = customer(&system, "Meera").await;

    let updated = system
        .customers
        .update_customer(
            id,
            CustomerUpdate {
                phone: Some("+91 90000 11111".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone.as_deref(), Some("+91 90000 11111"));
    assert_eq!(updated.email.as_deref(), Some("meera@example.com"));

    let fetched = system.customers.get(id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);

    let unreachable = system
        .customers
        .create_customer(CustomerCreate {
            name: "Nobody".to_string(),
            email: None,
            phone: Some("   ".to_string()),
        })
        .await;
    assert!(matches!(unreachable, Err(CustomerError::Validation(_))));

    let missing = system
        .customers
        .update_customer(CustomerId(99), CustomerUpdate::default())
        .await;
    assert_eq!(missing, Err(CustomerError::NotFound("customer_99".to_string())));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_orders_need_a_known_customer() {
    let (system, _clock, _notifier) = system();
    let result = system.orders.create_order(order(CustomerId(42), 30)).await;
    assert_eq!(
        result,
        Err(OrderError::InvalidCustomer("customer_42".to_string()))
    );
    system.shutdown().await.unwrap();
}
