//! Demo: one order followed from checkout to the courier's doorstep.
//!
//! Time is driven by a [`ManualClock`], so the ten-minute walk-through runs instantly. A
//! second order is cancelled inside its window and a third is refused after it.

use chrono::{Duration, Utc};
use order_tracker::config::TrackerConfig;
use order_tracker::lifecycle::{setup_tracing, OrderSystem};
use order_tracker::model::{CustomerCreate, CustomerId, DeliveryAddress, OrderCreate, OrderItem};
use order_tracker::notify::EmailNotifier;
use order_tracker::tracking::{Clock, ManualClock};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

fn basket(customer_id: CustomerId) -> OrderCreate {
    OrderCreate {
        customer_id,
        items: vec![
            OrderItem {
                product_id: 101,
                product_name: "Amul Toned Milk 1L".to_string(),
                product_image: None,
                platform_name: "Blinkit".to_string(),
                platform_price: 54.0,
                platform_delivery_fee: 0.0,
                quantity: 2,
            },
            OrderItem {
                product_id: 214,
                product_name: "Brown Bread 400g".to_string(),
                product_image: None,
                platform_name: "Zepto".to_string(),
                platform_price: 45.0,
                platform_delivery_fee: 15.0,
                quantity: 1,
            },
        ],
        total_price: 153.0,
        delivery_fee: 15.0,
        payment_method: "upi".to_string(),
        delivery: DeliveryAddress {
            address: Some("12 MG Road".to_string()),
            city: Some("Bengaluru".to_string()),
            pin_code: Some("560001".to_string()),
        },
        delivery_minutes: Some(30),
        delivery_estimate: Some("25-30 mins".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let config = TrackerConfig::from_env()?;

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let email = Arc::new(EmailNotifier::from_config(&config));
    let system = OrderSystem::new(&config, clock.clone(), email.clone());

    let customer_id = system
        .customers
        .create_customer(CustomerCreate {
            name: "Asha".to_string(),
            email: Some("asha@example.com".to_string()),
            phone: Some("+91 98450 12345".to_string()),
        })
        .await?;

    // Ten minutes of tracking, one status refresh every five seconds.
    let order_id = system.orders.create_order(basket(customer_id)).await?;
    let mut session = system.open_tracking(order_id, customer_id).await?;
    let step = Duration::from_std(config.status_refresh)?;
    let courier_every = (config.courier_step.as_millis() / config.status_refresh.as_millis()).max(1);

    async {
        let mut ticks = 0u128;
        while clock.now() - session.order().created_at < Duration::minutes(10) {
            clock.advance(step);
            ticks += 1;
            if let Some(toast) = session.refresh_status().await {
                info!(title = toast.title, description = toast.description, "Toast");
            }
            if ticks % courier_every == 0 {
                session.advance_courier();
            }
        }
        let snapshot = session.snapshot();
        info!(
            status = %snapshot.status,
            courier = snapshot.courier.label,
            countdown = %snapshot.countdown,
            progress = snapshot.progress_percent.round(),
            "After ten minutes"
        );
    }
    .instrument(tracing::info_span!("tracking", reference = %order_id.reference()))
    .await;

    // Cancelled two minutes in.
    let second = system.orders.create_order(basket(customer_id)).await?;
    clock.advance(Duration::minutes(2));
    let mut second_session = system.open_tracking(second, customer_id).await?;
    let cancelled = second_session.cancel().await?;
    info!(order_id = %cancelled.id, status = %cancelled.status, "Cancelled");

    // Too late six minutes in.
    let third = system.orders.create_order(basket(customer_id)).await?;
    clock.advance(Duration::minutes(6));
    if let Err(e) = system.orders.cancel_order(third, customer_id).await {
        warn!(order_id = %third, error = %e, "Cancellation refused");
    }

    for entry in system.order_history(customer_id).await {
        info!(reference = %entry.reference, status = %entry.status, items = entry.item_count, "History");
    }

    // Let fire-and-forget emails land before counting them.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    info!(sent = email.sent().len(), "Emails sent");

    // Sessions hold order clients; the order actor stops only once they are gone.
    drop(session);
    drop(second_session);
    system.shutdown().await?;
    Ok(())
}
