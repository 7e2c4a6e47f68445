use super::task_models::{TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigned_to_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    /// Absent = leave alone; null or "" = unassign; uuid = reassign.
    #[serde(default, deserialize_with = "deserialize_assignee")]
    #[schema(value_type = Option<Uuid>)]
    pub assigned_to_id: Option<Option<Uuid>>,
}

fn deserialize_assignee<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        None => Ok(Some(None)),
        Some(s) if s.trim().is_empty() => Ok(Some(None)),
        Some(s) => Uuid::parse_str(&s)
            .map(|id| Some(Some(id)))
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub sort_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_title_bounds() {
        let dto = CreateTaskRequest {
            title: String::new(),
            description: "desc".into(),
            due_date: Utc::now(),
            priority: TaskPriority::Low,
            status: TaskStatus::ToDo,
            assigned_to_id: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateTaskRequest {
            title: "x".repeat(101),
            description: "desc".into(),
            due_date: Utc::now(),
            priority: TaskPriority::Low,
            status: TaskStatus::ToDo,
            assigned_to_id: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_request_empty_description_rejected() {
        let dto = CreateTaskRequest {
            title: "Write report".into(),
            description: String::new(),
            due_date: Utc::now(),
            priority: TaskPriority::High,
            status: TaskStatus::ToDo,
            assigned_to_id: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_assignee_absent_means_unchanged() {
        let patch: UpdateTaskRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(patch.assigned_to_id, None);
    }

    #[test]
    fn test_update_assignee_null_clears() {
        let patch: UpdateTaskRequest =
            serde_json::from_str(r#"{"assignedToId":null}"#).unwrap();
        assert_eq!(patch.assigned_to_id, Some(None));
    }

    #[test]
    fn test_update_assignee_empty_string_clears() {
        let patch: UpdateTaskRequest = serde_json::from_str(r#"{"assignedToId":""}"#).unwrap();
        assert_eq!(patch.assigned_to_id, Some(None));
    }

    #[test]
    fn test_update_assignee_uuid_assigns() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"assignedToId":"{id}"}}"#);
        let patch: UpdateTaskRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(patch.assigned_to_id, Some(Some(id)));
    }

    #[test]
    fn test_update_status_uses_human_readable_form() {
        let patch: UpdateTaskRequest =
            serde_json::from_str(r#"{"status":"In Progress"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
        assert!(serde_json::from_str::<UpdateTaskRequest>(r#"{"status":"In_Progress"}"#).is_err());
    }
}
