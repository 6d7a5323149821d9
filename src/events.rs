//! Engine observability: past-tense events broadcast to subscribers
//! without ever blocking the queue engine.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

use crate::player::PlayOutcome;
use crate::request::CallRequest;

/// Queue engine events
#[derive(Debug, Clone)]
pub enum Event {
    /// A call passed validation and joined the pending queue
    CallEnqueued {
        request: CallRequest,
        queue_len: usize,
    },

    /// A call failed validation and was dropped
    CallRejected { reason: String },

    /// The engine started playing a queued call
    TaskStarted { request: CallRequest },

    /// A clip failed and was skipped; the sequence continued
    ClipSkipped {
        clip: PathBuf,
        outcome: PlayOutcome,
    },

    /// All clips of a call reached a terminal outcome
    TaskFinished { request: CallRequest },

    /// Pending queue was dropped without touching in-flight playback
    QueueCleared,

    /// In-flight playback was halted and the pending queue dropped
    PlaybackStopped,
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::CallEnqueued { request, queue_len } => {
                format!("Enqueued {} (queue length {})", request.description(), queue_len)
            }
            Event::CallRejected { reason } => format!("Rejected call: {}", reason),
            Event::TaskStarted { request } => format!("Announcing {}", request.description()),
            Event::ClipSkipped { clip, outcome } => {
                format!("Skipped clip {} ({:?})", clip.display(), outcome)
            }
            Event::TaskFinished { request } => {
                format!("Finished announcing {}", request.description())
            }
            Event::QueueCleared => "Queue cleared".to_string(),
            Event::PlaybackStopped => "Playback stopped".to_string(),
        }
    }
}

/// Handle for cancelling a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

struct Subscription {
    id: SubscriptionId,
    sender: Sender<Event>,
}

#[derive(Default)]
struct Registry {
    subscriptions: Vec<Subscription>,
    next_id: usize,
}

/// Fan-out channel for engine events.
///
/// Cheap to clone; clones share the same subscriber registry. Publishing
/// uses non-blocking sends, so a slow or abandoned subscriber never stalls
/// the drain worker.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<RwLock<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a subscription; events published from now on arrive on the
    /// returned receiver.
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriptionId) {
        let (tx, rx) = unbounded();

        let mut registry = self.registry.write();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscriptions.push(Subscription { id, sender: tx });

        (rx, id)
    }

    /// Cancel a subscription
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.registry.write().subscriptions.retain(|s| s.id != id);
    }

    /// Broadcast an event to every open subscription
    pub fn publish(&self, event: Event) {
        for subscription in self.registry.read().subscriptions.iter() {
            // A dropped receiver just misses the event
            let _ = subscription.sender.try_send(event.clone());
        }
    }

    /// Number of open subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.read().subscriptions.len()
    }
}
