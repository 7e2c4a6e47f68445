use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::WsEvent;

pub type WsSender = mpsc::UnboundedSender<WsEvent>;

/// Registry of live connections keyed by user id. Each user id doubles as
/// their private channel; delivery is fire-and-forget.
#[derive(Clone)]
pub struct ConnectionManager {
    connections: Arc<DashMap<Uuid, WsSender>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
        }
    }

    pub fn add_connection(&self, user_id: Uuid, sender: WsSender) {
        self.connections.insert(user_id, sender);
        tracing::info!("User {} connected via WebSocket", user_id);
    }

    pub fn remove_connection(&self, user_id: &Uuid) {
        self.connections.remove(user_id);
        tracing::info!("User {} disconnected from WebSocket", user_id);
    }

    /// Targeted delivery to one user's channel. Dropped if they are offline.
    pub fn send_to_user(&self, user_id: &Uuid, event: WsEvent) -> bool {
        if let Some(sender) = self.connections.get(user_id) {
            sender.send(event).is_ok()
        } else {
            false
        }
    }

    /// Deliver to every connected client.
    pub fn broadcast(&self, event: WsEvent) {
        for entry in self.connections.iter() {
            let _ = entry.value().send(event.clone());
        }
    }

    pub fn online_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_targeted_delivery_reaches_only_that_user() {
        let manager = ConnectionManager::new();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        manager.add_connection(user_a, tx_a);
        manager.add_connection(user_b, tx_b);

        assert!(manager.send_to_user(&user_a, WsEvent::NotificationNew));

        assert!(matches!(rx_a.recv().await, Some(WsEvent::NotificationNew)));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_everyone() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        manager.add_connection(Uuid::new_v4(), tx_a);
        manager.add_connection(Uuid::new_v4(), tx_b);

        manager.broadcast(WsEvent::NotificationNew);

        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[test]
    fn test_send_to_offline_user_is_dropped() {
        let manager = ConnectionManager::new();
        assert!(!manager.send_to_user(&Uuid::new_v4(), WsEvent::NotificationNew));
    }

    #[test]
    fn test_remove_connection() {
        let manager = ConnectionManager::new();
        let user_id = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        manager.add_connection(user_id, tx);
        assert_eq!(manager.online_count(), 1);

        manager.remove_connection(&user_id);
        assert_eq!(manager.online_count(), 0);
        assert!(!manager.send_to_user(&user_id, WsEvent::NotificationNew));
    }
}
