//! # Broadcast Channel
//!
//! One topic per show. Every subscriber owns an unbounded queue, so publishing never waits
//! for a slow consumer and each subscriber sees the events of a show in publish order.
//!
//! Subscribers are identified by a caller-chosen id (typically a connection id).
//! Subscribing again with the same id replaces the previous stream, which then ends.
//! Streams that were dropped are pruned on the next publish to their show.

use crate::model::{ShowEvent, ShowId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

type Topic = Mutex<HashMap<String, mpsc::UnboundedSender<ShowEvent>>>;

/// Fan-out of [`ShowEvent`]s to the subscribers of each show.
///
/// Cloning is cheap; all clones share the same topics.
#[derive(Clone, Default)]
pub struct ShowBroadcaster {
    topics: Arc<RwLock<HashMap<ShowId, Arc<Topic>>>>,
}

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription {
    pub show_id: ShowId,
    pub subscriber_id: String,
    receiver: mpsc::UnboundedReceiver<ShowEvent>,
}

impl Subscription {
    /// Next event, or `None` once the subscription was replaced or removed.
    pub async fn recv(&mut self) -> Option<ShowEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ShowEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn into_stream(self) -> UnboundedReceiverStream<ShowEvent> {
        UnboundedReceiverStream::new(self.receiver)
    }
}

impl ShowBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn topic(&self, show_id: ShowId) -> Option<Arc<Topic>> {
        let topics = self.topics.read().unwrap_or_else(|e| e.into_inner());
        topics.get(&show_id).cloned()
    }

    /// Delivers `event` to every live subscriber of its show. Returns the number reached.
    pub fn publish(&self, event: ShowEvent) -> usize {
        let show_id = event.show_id();
        let Some(topic) = self.topic(show_id) else {
            debug!(%show_id, event = event.name(), "No subscribers");
            return 0;
        };

        let mut subscribers = topic.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|subscriber_id, sender| {
            let alive = sender.send(event.clone()).is_ok();
            if !alive {
                debug!(%show_id, %subscriber_id, "Pruned closed subscriber");
            }
            alive
        });
        let delivered = subscribers.len();
        debug!(%show_id, event = event.name(), delivered, "Published");
        delivered
    }

    pub fn subscribe(&self, show_id: ShowId, subscriber_id: impl Into<String>) -> Subscription {
        let subscriber_id = subscriber_id.into();
        let (sender, receiver) = mpsc::unbounded_channel();

        let topic = {
            let mut topics = self.topics.write().unwrap_or_else(|e| e.into_inner());
            Arc::clone(topics.entry(show_id).or_default())
        };
        let replaced = topic
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(subscriber_id.clone(), sender)
            .is_some();
        debug!(%show_id, %subscriber_id, replaced, "Subscribed");

        Subscription {
            show_id,
            subscriber_id,
            receiver,
        }
    }

    /// Removes a subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, show_id: ShowId, subscriber_id: &str) -> bool {
        let mut topics = self.topics.write().unwrap_or_else(|e| e.into_inner());
        let Some(topic) = topics.get(&show_id) else {
            return false;
        };
        let (removed, empty) = {
            let mut subscribers = topic.lock().unwrap_or_else(|e| e.into_inner());
            let removed = subscribers.remove(subscriber_id).is_some();
            (removed, subscribers.is_empty())
        };
        if empty {
            topics.remove(&show_id);
        }
        debug!(%show_id, %subscriber_id, removed, "Unsubscribed");
        removed
    }

    /// Number of subscribers currently registered for `show_id`.
    pub fn subscriber_count(&self, show_id: ShowId) -> usize {
        self.topic(show_id)
            .map(|topic| topic.lock().unwrap_or_else(|e| e.into_inner()).len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookingId, UnblockReason};
    use tokio_stream::StreamExt;

    fn unblocked(show: u64, seat: &str) -> ShowEvent {
        ShowEvent::SeatsUnblocked {
            show_id: ShowId(show),
            holder_id: "alice".into(),
            seats: vec![seat.parse().unwrap()],
            reason: UnblockReason::Released,
        }
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order_per_show() {
        let broadcaster = ShowBroadcaster::new();
        let mut first = broadcaster.subscribe(ShowId(1), "conn-1");
        let mut other_show = broadcaster.subscribe(ShowId(2), "conn-2");

        assert_eq!(broadcaster.publish(unblocked(1, "A1")), 1);
        assert_eq!(broadcaster.publish(unblocked(1, "A2")), 1);

        assert_eq!(first.recv().await, Some(unblocked(1, "A1")));
        assert_eq!(first.recv().await, Some(unblocked(1, "A2")));
        assert!(other_show.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_resubscribe_replaces_previous_stream() {
        let broadcaster = ShowBroadcaster::new();
        let mut old = broadcaster.subscribe(ShowId(1), "conn-1");
        let new = broadcaster.subscribe(ShowId(1), "conn-1");
        assert_eq!(broadcaster.subscriber_count(ShowId(1)), 1);

        let event = ShowEvent::BookingCancelled {
            show_id: ShowId(1),
            booking_id: BookingId::new(),
            seats: vec!["A1".parse().unwrap()],
        };
        broadcaster.publish(event.clone());

        assert_eq!(old.recv().await, None);
        let mut stream = new.into_stream();
        assert_eq!(stream.next().await, Some(event));
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_pruned() {
        let broadcaster = ShowBroadcaster::new();
        let gone = broadcaster.subscribe(ShowId(1), "conn-1");
        let _kept = broadcaster.subscribe(ShowId(1), "conn-2");
        drop(gone);

        assert_eq!(broadcaster.publish(unblocked(1, "A1")), 1);
        assert_eq!(broadcaster.subscriber_count(ShowId(1)), 1);

        assert!(broadcaster.unsubscribe(ShowId(1), "conn-2"));
        assert!(!broadcaster.unsubscribe(ShowId(1), "conn-2"));
        assert_eq!(broadcaster.publish(unblocked(1, "A2")), 0);
    }
}
