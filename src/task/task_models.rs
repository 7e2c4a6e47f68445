use crate::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Task status. One enum, two spellings: serde carries the human-readable API
/// form, sqlx carries the underscore storage form. Services only ever see the
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum TaskStatus {
    #[serde(rename = "To Do")]
    #[sqlx(rename = "To_Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In_Progress")]
    InProgress,
    Review,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::ToDo => write!(f, "To Do"),
            TaskStatus::InProgress => write!(f, "In Progress"),
            TaskStatus::Review => write!(f, "Review"),
            TaskStatus::Completed => write!(f, "Completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "Low"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::High => write!(f, "High"),
            TaskPriority::Urgent => write!(f, "Urgent"),
        }
    }
}

/// Row shape produced by the joined task queries: the task plus the flattened
/// creator and assignee columns.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub creator_id: Uuid,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator_name: String,
    pub creator_email: String,
    pub assignee_name: Option<String>,
    pub assignee_email: Option<String>,
}

/// API shape of a task, with creator/assignee summaries attached.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub creator_id: Uuid,
    pub assigned_to_id: Option<Uuid>,
    pub creator: UserSummary,
    pub assigned_to: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRecord> for TaskResponse {
    fn from(record: TaskRecord) -> Self {
        let assigned_to = match (record.assigned_to_id, record.assignee_name, record.assignee_email)
        {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            due_date: record.due_date,
            priority: record.priority,
            status: record.status,
            creator_id: record.creator_id,
            assigned_to_id: record.assigned_to_id,
            creator: UserSummary {
                id: record.creator_id,
                name: record.creator_name,
                email: record.creator_email,
            },
            assigned_to,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_human_readable() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::ToDo).unwrap(),
            "\"To Do\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Review).unwrap(),
            "\"Review\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"Completed\""
        );
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TaskStatus::ToDo,
            TaskStatus::InProgress,
            TaskStatus::Review,
            TaskStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: TaskStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_storage_form_is_not_a_legal_api_status() {
        assert!(serde_json::from_str::<TaskStatus>("\"To_Do\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"In_Progress\"").is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"Done\"").is_err());
    }

    #[test]
    fn test_status_display_matches_api_form() {
        assert_eq!(TaskStatus::ToDo.to_string(), "To Do");
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
        assert_eq!(TaskStatus::Review.to_string(), "Review");
        assert_eq!(TaskStatus::Completed.to_string(), "Completed");
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Urgent,
        ] {
            let json = serde_json::to_string(&priority).unwrap();
            let back: TaskPriority = serde_json::from_str(&json).unwrap();
            assert_eq!(back, priority);
        }
        assert!(serde_json::from_str::<TaskPriority>("\"Critical\"").is_err());
    }
}
