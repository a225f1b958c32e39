//! Change notifications delivered to subscribed views.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// A state change announced by the project store or module graph cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The active project switched to `name`.
    ActiveProjectChanged {
        /// Name of the newly active project.
        name: String,
    },
    /// The project list or a project's file lists changed; tree views should refresh.
    TreeChanged {
        /// Name of the project whose state changed.
        project: String,
    },
    /// The module hierarchy was replaced by a fresh parse.
    HierarchyReloaded {
        /// The top module selected for the new hierarchy.
        top: String,
    },
    /// The top module changed without a reparse.
    TopModuleChanged {
        /// The newly selected top module.
        top: String,
    },
}

/// Fan-out channel for [`Notification`]s.
///
/// Cloning the bus yields another handle to the same subscriber list, so the
/// store and the cache can be constructed with a shared bus. Subscribers whose
/// receiver has been dropped are pruned on the next publish.
#[derive(Clone, Default)]
pub struct NotificationBus {
    subscribers: Arc<Mutex<Vec<Sender<Notification>>>>,
}

impl NotificationBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&self) -> Receiver<Notification> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Delivers `notification` to every live subscriber.
    pub fn publish(&self, notification: Notification) {
        tracing::debug!(?notification, "publish");
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(notification.clone()).is_ok());
    }

    /// Returns the number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
