//! Unread-notification badge.
//!
//! A background loop asks the backend for notifications on a fixed interval
//! and publishes the unread count through a `watch` channel. Each poll is
//! awaited before the next tick and missed ticks are skipped, so a slow
//! backend never sees overlapping requests.

use crate::api::ApiClient;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub struct NotificationPoller {
    receiver: watch::Receiver<Option<usize>>,
    task: JoinHandle<()>,
}

impl NotificationPoller {
    pub fn start(runtime: &Handle, api: ApiClient, every: Duration) -> Self {
        let (sender, receiver) = watch::channel(None);
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match api.unread_notifications().await {
                    Ok(count) => {
                        debug!("Unread notifications: {}", count);
                        if sender.send(Some(count)).is_err() {
                            break;
                        }
                    }
                    // Badge keeps its last value
                    Err(e) => warn!("Notification poll failed: {:#}", e),
                }
            }
        });
        Self { receiver, task }
    }

    /// Last known unread count; `None` until the first successful poll.
    pub fn unread(&self) -> Option<usize> {
        *self.receiver.borrow()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
