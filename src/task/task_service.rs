use super::task_dto::{CreateTaskRequest, TaskQuery, UpdateTaskRequest};
use super::task_models::{TaskRecord, TaskResponse};
use super::task_repository::{TaskChanges, TaskFilters, TaskRepository};
use crate::error::{AppError, Result};
use crate::notification::notification_repository::NotificationRepository;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub assigned_to_me: Vec<TaskResponse>,
    pub created_by_me: Vec<TaskResponse>,
    pub overdue: Vec<TaskResponse>,
}

/// A freshly created task is announced to its assignee unless the creator
/// assigned it to themselves.
fn assignment_target(assigned_to_id: Option<Uuid>, creator_id: Uuid) -> Option<Uuid> {
    assigned_to_id.filter(|id| *id != creator_id)
}

/// An update warrants a reassignment notice only when the patch actually moved
/// the task to a different, non-null assignee who is not the caller.
fn reassignment_target(
    patch: Option<Option<Uuid>>,
    previous: Option<Uuid>,
    caller: Uuid,
) -> Option<Uuid> {
    match patch {
        Some(Some(new_assignee)) if Some(new_assignee) != previous && new_assignee != caller => {
            Some(new_assignee)
        }
        _ => None,
    }
}

fn involves_user(task: &TaskRecord, user_id: Uuid) -> bool {
    task.creator_id == user_id || task.assigned_to_id == Some(user_id)
}

#[derive(Clone)]
pub struct TaskService {
    task_repo: TaskRepository,
    notification_repo: NotificationRepository,
}

impl TaskService {
    pub fn new(task_repo: TaskRepository, notification_repo: NotificationRepository) -> Self {
        Self {
            task_repo,
            notification_repo,
        }
    }

    pub async fn create_task(
        &self,
        payload: CreateTaskRequest,
        creator_id: Uuid,
    ) -> Result<TaskResponse> {
        let task = self
            .task_repo
            .create(
                &payload.title,
                &payload.description,
                payload.due_date,
                payload.priority,
                payload.status,
                creator_id,
                payload.assigned_to_id,
            )
            .await?;

        if let Some(assignee) = assignment_target(payload.assigned_to_id, creator_id) {
            self.notification_repo
                .create(
                    assignee,
                    Some(task.id),
                    &format!("You have been assigned a new task: {}", task.title),
                )
                .await?;
        }

        Ok(task.into())
    }

    pub async fn get_all_tasks(&self, query: TaskQuery) -> Result<Vec<TaskResponse>> {
        let tasks = self
            .task_repo
            .find_all(TaskFilters {
                status: query.status,
                priority: query.priority,
                sort_by: query.sort_by,
            })
            .await?;

        Ok(tasks.into_iter().map(Into::into).collect())
    }

    pub async fn get_task_by_id(&self, id: Uuid) -> Result<TaskResponse> {
        self.task_repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))
    }

    /// Any authenticated user may update any task; only delete is restricted
    /// to the creator. The All Tasks board relies on shared editing.
    pub async fn update_task(
        &self,
        id: Uuid,
        payload: UpdateTaskRequest,
        user_id: Uuid,
    ) -> Result<TaskResponse> {
        let existing = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        let notify = reassignment_target(payload.assigned_to_id, existing.assigned_to_id, user_id);

        let task = self
            .task_repo
            .update(
                id,
                TaskChanges {
                    title: payload.title,
                    description: payload.description,
                    due_date: payload.due_date,
                    priority: payload.priority,
                    status: payload.status,
                    assigned_to_id: payload.assigned_to_id,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if let Some(assignee) = notify {
            self.notification_repo
                .create(
                    assignee,
                    Some(task.id),
                    &format!("You have been assigned to task: {}", task.title),
                )
                .await?;
        }

        Ok(task.into())
    }

    pub async fn delete_task(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let task = self
            .task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

        if task.creator_id != user_id {
            return Err(AppError::Forbidden(
                "Only the creator can delete this task".to_string(),
            ));
        }

        self.task_repo.delete(id).await?;
        Ok(())
    }

    pub async fn get_dashboard_stats(&self, user_id: Uuid) -> Result<DashboardStats> {
        let (assigned_to_me, created_by_me, overdue) = tokio::try_join!(
            self.task_repo.find_by_assignee(user_id),
            self.task_repo.find_by_creator(user_id),
            self.task_repo.find_overdue(),
        )?;

        let overdue = overdue
            .into_iter()
            .filter(|task| involves_user(task, user_id))
            .map(Into::into)
            .collect();

        Ok(DashboardStats {
            assigned_to_me: assigned_to_me.into_iter().map(Into::into).collect(),
            created_by_me: created_by_me.into_iter().map(Into::into).collect(),
            overdue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::task_models::{TaskPriority, TaskStatus};
    use chrono::Utc;

    fn record(creator_id: Uuid, assigned_to_id: Option<Uuid>) -> TaskRecord {
        TaskRecord {
            id: Uuid::new_v4(),
            title: "Write report".into(),
            description: "Q3 summary".into(),
            due_date: Utc::now(),
            priority: TaskPriority::High,
            status: TaskStatus::ToDo,
            creator_id,
            assigned_to_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            creator_name: "Ada".into(),
            creator_email: "ada@example.com".into(),
            assignee_name: assigned_to_id.map(|_| "Grace".into()),
            assignee_email: assigned_to_id.map(|_| "grace@example.com".into()),
        }
    }

    #[test]
    fn test_no_notification_without_assignee() {
        let creator = Uuid::new_v4();
        assert_eq!(assignment_target(None, creator), None);
    }

    #[test]
    fn test_no_notification_for_self_assignment() {
        let creator = Uuid::new_v4();
        assert_eq!(assignment_target(Some(creator), creator), None);
    }

    #[test]
    fn test_notification_for_other_assignee() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        assert_eq!(assignment_target(Some(assignee), creator), Some(assignee));
    }

    #[test]
    fn test_reassignment_notifies_new_assignee() {
        let caller = Uuid::new_v4();
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        assert_eq!(
            reassignment_target(Some(Some(new)), Some(old), caller),
            Some(new)
        );
    }

    #[test]
    fn test_reassignment_skips_unchanged_assignee() {
        let caller = Uuid::new_v4();
        let same = Uuid::new_v4();
        assert_eq!(reassignment_target(Some(Some(same)), Some(same), caller), None);
    }

    #[test]
    fn test_reassignment_skips_clear_and_absent() {
        let caller = Uuid::new_v4();
        let old = Uuid::new_v4();
        assert_eq!(reassignment_target(Some(None), Some(old), caller), None);
        assert_eq!(reassignment_target(None, Some(old), caller), None);
    }

    #[test]
    fn test_reassignment_skips_caller_as_assignee() {
        let caller = Uuid::new_v4();
        let old = Uuid::new_v4();
        assert_eq!(reassignment_target(Some(Some(caller)), Some(old), caller), None);
    }

    #[test]
    fn test_overdue_filter_keeps_creator_and_assignee() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(involves_user(&record(me, None), me));
        assert!(involves_user(&record(other, Some(me)), me));
        assert!(!involves_user(&record(other, Some(other)), me));
        assert!(!involves_user(&record(other, None), me));
    }

    #[test]
    fn test_task_response_attaches_summaries() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let response: TaskResponse = record(creator, Some(assignee)).into();

        assert_eq!(response.creator.id, creator);
        assert_eq!(response.creator.name, "Ada");
        let assigned = response.assigned_to.unwrap();
        assert_eq!(assigned.id, assignee);
        assert_eq!(assigned.email, "grace@example.com");

        let unassigned: TaskResponse = record(creator, None).into();
        assert!(unassigned.assigned_to.is_none());
    }
}
