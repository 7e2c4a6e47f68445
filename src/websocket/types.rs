use crate::task::task_models::TaskResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Server to client events. A cooperative cache-invalidation signal, not a
/// durable log: no ordering guarantee, no acks, no replay after disconnect.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    #[serde(rename = "task:created")]
    TaskCreated(TaskResponse),
    #[serde(rename = "task:updated")]
    TaskUpdated(TaskResponse),
    #[serde(rename = "task:deleted")]
    TaskDeleted(TaskDeletedPayload),
    #[serde(rename = "task:assigned")]
    TaskAssigned(TaskResponse),
    #[serde(rename = "notification:new")]
    NotificationNew,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskDeletedPayload {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_event_wire_format() {
        let id = Uuid::new_v4();
        let json =
            serde_json::to_value(WsEvent::TaskDeleted(TaskDeletedPayload { id })).unwrap();
        assert_eq!(json["event"], "task:deleted");
        assert_eq!(json["data"]["id"], id.to_string());
    }

    #[test]
    fn test_notification_event_has_no_payload() {
        let json = serde_json::to_value(WsEvent::NotificationNew).unwrap();
        assert_eq!(json["event"], "notification:new");
        assert!(json.get("data").is_none());
    }
}
