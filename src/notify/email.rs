//! Transactional order emails.
//!
//! Rendering is separate from sending so the text can be checked without a transport.
//! The transport itself is simulated: a rendered message is logged and kept in an outbox.

use crate::config::TrackerConfig;
use crate::model::Contact;
use crate::notify::{Notification, NotificationKind, Notifier, NotifyError, OrderSummary};
use crate::tracking::DerivedStatus;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email notifier backed by an in-memory outbox.
#[derive(Debug)]
pub struct EmailNotifier {
    sender: String,
    phone_domain: String,
    outbox: Mutex<Vec<EmailMessage>>,
}

impl EmailNotifier {
    pub fn new(sender: impl Into<String>, phone_domain: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            phone_domain: phone_domain.into(),
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.email_sender.clone(), config.phone_email_domain.clone())
    }

    /// Messages handed to the transport so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The address an email for `contact` goes to.
    ///
    /// Phone-only accounts get a mailbox on the phone domain, named after the digits of
    /// their number.
    pub fn address_for(&self, contact: &Contact) -> Option<String> {
        if let Some(email) = contact.email.as_deref().filter(|e| !e.trim().is_empty()) {
            return Some(email.to_string());
        }
        let digits: String = contact
            .phone
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then(|| format!("{}@{}", digits, self.phone_domain))
    }

    pub fn render(&self, notification: &Notification) -> Result<EmailMessage, NotifyError> {
        let to = self
            .address_for(&notification.recipient)
            .ok_or_else(|| NotifyError::MissingRecipient(notification.summary.reference.clone()))?;
        let summary = &notification.summary;
        let name = greeting_name(&notification.recipient);

        let (subject, body) = match &notification.kind {
            NotificationKind::Confirmed => (
                format!("Order Confirmed! #{}", summary.reference),
                confirmation_body(name, summary),
            ),
            NotificationKind::StatusChanged(status) => (
                format!("{} - Order #{}", status_headline(*status), summary.reference),
                status_body(name, *status, summary),
            ),
            NotificationKind::Cancelled { cancelled_at } => (
                format!("Order Cancelled - #{}", summary.reference),
                format!(
                    "Hi {name},\n\nYour order #{} was cancelled on {}.\n\
                     Amount: ₹{:.2} ({})\n\nAny payment made will be refunded.\n",
                    summary.reference,
                    cancelled_at.format("%d %b %Y, %H:%M UTC"),
                    summary.grand_total,
                    summary.payment_method,
                ),
            ),
        };

        Ok(EmailMessage {
            from: self.sender.clone(),
            to,
            subject,
            body,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    #[instrument(skip(self, notification), fields(order_id = %notification.order_id))]
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = self.render(notification)?;
        debug!(?message, "Rendered email");
        info!(to = %message.to, subject = %message.subject, "Email queued");
        self.outbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(())
    }
}

fn greeting_name(contact: &Contact) -> &str {
    if contact.name.trim().is_empty() {
        "there"
    } else {
        &contact.name
    }
}

fn status_headline(status: DerivedStatus) -> String {
    if status == DerivedStatus::OutForDelivery {
        "🚚 Your order is on the way!".to_string()
    } else {
        format!("📦 Your order status has been updated to: {}", status)
    }
}

fn confirmation_body(name: &str, summary: &OrderSummary) -> String {
    let mut body = format!(
        "Hi {name},\n\nThanks for your order #{}!\n\n",
        summary.reference
    );
    write_lines(&mut body, summary);
    let _ = writeln!(body, "Subtotal: ₹{:.2}", summary.total_price);
    let _ = writeln!(body, "Delivery: ₹{:.2}", summary.delivery_fee);
    let _ = writeln!(body, "Total: ₹{:.2} ({})", summary.grand_total, summary.payment_method);
    write_delivery(&mut body, summary);
    body
}

fn status_body(name: &str, status: DerivedStatus, summary: &OrderSummary) -> String {
    let mut body = format!("Hi {name},\n\nOrder #{} is now: {}\n\n", summary.reference, status);
    write_lines(&mut body, summary);
    let _ = writeln!(body, "Total: ₹{:.2}", summary.grand_total);
    write_delivery(&mut body, summary);
    body
}

fn write_lines(body: &mut String, summary: &OrderSummary) {
    for line in &summary.lines {
        let _ = writeln!(
            body,
            "  {} x{} from {} - ₹{:.2}",
            line.product_name, line.quantity, line.platform_name, line.line_total
        );
    }
    body.push('\n');
}

fn write_delivery(body: &mut String, summary: &OrderSummary) {
    if let Some(address) = &summary.address {
        let _ = writeln!(body, "Delivering to: {address}");
    }
    if let Some(estimate) = &summary.delivery_estimate {
        let _ = writeln!(body, "Estimated delivery: {estimate}");
    }
}
