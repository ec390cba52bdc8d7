use crate::notify::{Notification, Notifier, NotifyError};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;

/// Keeps every notification it is asked to send.
///
/// A failing recorder still records the attempt before returning
/// [`NotifyError::Transport`].
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
    changed: Notify,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Waits until at least `count` notifications have arrived and returns all of them.
    pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
        loop {
            let changed = self.changed.notified();
            let received = self.notifications();
            if received.len() >= count {
                return received;
            }
            changed.await;
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        self.changed.notify_waiters();

        if self.fail {
            Err(NotifyError::Transport("recording notifier set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}
