use std::collections::HashMap;

use tokio::sync::broadcast;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::{NotificationTarget, SessionEvent, TargetedEvent};

/// Fans out session events to one, many, or all connected users.
///
/// One lazily-created broadcast channel per session; every WebSocket
/// connection of that session subscribes to it and filters events by
/// target on its own side. Delivery is fire and forget: a send into a
/// channel with no subscribers is logged and dropped, never retried,
/// and acknowledgments are requested but never awaited.
pub struct NotificationDispatcher {
    channels: RwLock<HashMap<String, broadcast::Sender<TargetedEvent>>>,
    capacity: usize,
}

impl NotificationDispatcher {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribe to the event stream of a session, creating its channel
    /// on first use
    pub async fn subscribe(&self, session_id: &str) -> broadcast::Receiver<TargetedEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(session_id.to_string())
            .or_insert_with(|| {
                let (tx, _rx) = broadcast::channel::<TargetedEvent>(self.capacity);
                tx
            })
            .subscribe()
    }

    /// Announce an event to a single user of a session
    pub async fn notify_user(&self, session_id: &str, user_id: &str, event: SessionEvent) -> usize {
        self.send(
            session_id,
            NotificationTarget::User {
                user_id: user_id.to_string(),
            },
            event,
        )
        .await
    }

    /// Announce an event to a set of users of a session
    pub async fn notify_users(
        &self,
        session_id: &str,
        user_ids: Vec<String>,
        event: SessionEvent,
    ) -> usize {
        self.send(session_id, NotificationTarget::Users { user_ids }, event)
            .await
    }

    /// Announce an event to every connected user of a session
    pub async fn broadcast(&self, session_id: &str, event: SessionEvent) -> usize {
        self.send(session_id, NotificationTarget::Broadcast, event)
            .await
    }

    /// Push a targeted event into the session channel; returns how many
    /// subscribers received it
    pub async fn send(
        &self,
        session_id: &str,
        target: NotificationTarget,
        event: SessionEvent,
    ) -> usize {
        let channels = self.channels.read().await;
        let Some(tx) = channels.get(session_id) else {
            debug!(
                "No channel for session '{}', dropping event '{}'",
                session_id, event.kind
            );
            return 0;
        };

        match tx.send(TargetedEvent { target, event }) {
            Ok(receivers) => receivers,
            Err(e) => {
                // Channel exists but nobody is listening; fire and forget
                warn!("No subscribers for session '{}': {}", session_id, e);
                0
            }
        }
    }

    /// Live subscriber count of a session channel
    pub async fn subscriber_count(&self, session_id: &str) -> usize {
        self.channels
            .read()
            .await
            .get(session_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Drop the channel of a cleared session; existing receivers see the
    /// stream end once in-flight events drain
    pub async fn drop_session(&self, session_id: &str) -> bool {
        self.channels.write().await.remove(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(session: &str, kind: &str) -> SessionEvent {
        SessionEvent::new(session, kind, format!("{} happened", kind), false)
    }

    #[tokio::test]
    async fn send_without_channel_is_dropped() {
        let dispatcher = NotificationDispatcher::new(16);
        assert_eq!(dispatcher.broadcast("s1", event("s1", "noop")).await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let dispatcher = NotificationDispatcher::new(16);

        let mut rx_a = dispatcher.subscribe("s1").await;
        let mut rx_b = dispatcher.subscribe("s1").await;

        let delivered = dispatcher.broadcast("s1", event("s1", "fileChanged")).await;
        assert_eq!(delivered, 2);

        assert_eq!(rx_a.recv().await.unwrap().event.kind, "fileChanged");
        assert_eq!(rx_b.recv().await.unwrap().event.kind, "fileChanged");
    }

    #[tokio::test]
    async fn user_target_is_filterable_by_receivers() {
        let dispatcher = NotificationDispatcher::new(16);
        let mut rx = dispatcher.subscribe("s1").await;

        dispatcher
            .notify_user("s1", "alice", event("s1", "lockGranted"))
            .await;

        let targeted = rx.recv().await.unwrap();
        assert!(targeted.target.matches("alice"));
        assert!(!targeted.target.matches("bob"));
    }

    #[tokio::test]
    async fn users_target_matches_exactly_the_listed_users() {
        let dispatcher = NotificationDispatcher::new(16);
        let mut rx = dispatcher.subscribe("s1").await;

        dispatcher
            .notify_users(
                "s1",
                vec!["alice".to_string(), "bob".to_string()],
                event("s1", "roleChanged"),
            )
            .await;

        let targeted = rx.recv().await.unwrap();
        assert!(targeted.target.matches("alice"));
        assert!(targeted.target.matches("bob"));
        assert!(!targeted.target.matches("carol"));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let dispatcher = NotificationDispatcher::new(16);

        let mut rx_s1 = dispatcher.subscribe("s1").await;
        let _rx_s2 = dispatcher.subscribe("s2").await;

        assert_eq!(dispatcher.broadcast("s2", event("s2", "ping")).await, 1);

        // Nothing arrived on s1
        assert!(matches!(
            rx_s1.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn drop_session_removes_the_channel() {
        let dispatcher = NotificationDispatcher::new(16);

        let _rx = dispatcher.subscribe("s1").await;
        assert_eq!(dispatcher.subscriber_count("s1").await, 1);

        assert!(dispatcher.drop_session("s1").await);
        assert!(!dispatcher.drop_session("s1").await);
        assert_eq!(dispatcher.subscriber_count("s1").await, 0);
    }
}
