//! Process-wide notification change signal.
//!
//! [`NotifyBus`] decouples the write path (fan-out, delivery job) from the
//! client read path: whenever notification state changes, an event is
//! published and any live [`ClientNotificationState`](crate::client)
//! refreshes itself. It is an explicit object passed by `Arc` from the
//! application root; there is no module-level callback slot.

use pawsome_core::types::DbId;
use tokio::sync::broadcast;

/// A notification-state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyEvent {
    /// The fan-out created a record for `recipient`.
    RecordCreated { recipient: DbId },
    /// `recipient` marked one of their records read.
    RecordRead { recipient: DbId },
    /// The delivery job finished processing a push request staged for
    /// `recipient` (success or recorded failure).
    PushProcessed { recipient: DbId },
}

impl NotifyEvent {
    /// The user whose notification list this event concerns.
    pub fn recipient(&self) -> DbId {
        match *self {
            Self::RecordCreated { recipient }
            | Self::RecordRead { recipient }
            | Self::PushProcessed { recipient } => recipient,
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out signal hub.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`NotifyEvent`].
pub struct NotifyBus {
    sender: broadcast::Sender<NotifyEvent>,
}

impl NotifyBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; the stored
    /// records remain the source of truth either way.
    pub fn publish(&self, event: NotifyEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<NotifyEvent> {
        self.sender.subscribe()
    }
}

impl Default for NotifyBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
