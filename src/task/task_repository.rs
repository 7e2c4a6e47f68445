use super::task_models::{TaskPriority, TaskRecord, TaskStatus};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Joined select so every read carries the creator/assignee summaries.
const SELECT_TASK: &str = "SELECT t.id, t.title, t.description, t.due_date, t.priority, t.status,
        t.creator_id, t.assigned_to_id, t.created_at, t.updated_at,
        c.name AS creator_name, c.email AS creator_email,
        a.name AS assignee_name, a.email AS assignee_email
     FROM tasks t
     JOIN users c ON c.id = t.creator_id
     LEFT JOIN users a ON a.id = t.assigned_to_id";

#[derive(Debug, Default)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub sort_by: Option<String>,
}

/// Patch applied by `update`; `assigned_to_id` is tri-state (absent / clear / set).
#[derive(Debug, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assigned_to_id: Option<Option<Uuid>>,
}

/// Whitelisted sort keys; anything else falls back to creation time.
fn sort_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("dueDate") => "t.due_date",
        Some("priority") => "t.priority",
        Some("title") => "t.title",
        _ => "t.created_at",
    }
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, filters: TaskFilters) -> Result<Vec<TaskRecord>> {
        let mut query = format!("{SELECT_TASK} WHERE TRUE");
        let mut params_count = 0;

        if filters.status.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND t.status = ${}", params_count));
        }

        if filters.priority.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND t.priority = ${}", params_count));
        }

        query.push_str(&format!(
            " ORDER BY {} DESC",
            sort_column(filters.sort_by.as_deref())
        ));

        let mut db_query = sqlx::query_as::<_, TaskRecord>(&query);

        if let Some(status) = filters.status {
            db_query = db_query.bind(status);
        }

        if let Some(priority) = filters.priority {
            db_query = db_query.bind(priority);
        }

        let tasks = db_query.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskRecord>> {
        let task = sqlx::query_as::<_, TaskRecord>(&format!("{SELECT_TASK} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        due_date: DateTime<Utc>,
        priority: TaskPriority,
        status: TaskStatus,
        creator_id: Uuid,
        assigned_to_id: Option<Uuid>,
    ) -> Result<TaskRecord> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO tasks (title, description, due_date, priority, status, creator_id, assigned_to_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(title)
        .bind(description)
        .bind(due_date)
        .bind(priority)
        .bind(status)
        .bind(creator_id)
        .bind(assigned_to_id)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or(AppError::Internal)
    }

    pub async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<TaskRecord>> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut params_count = 1; // $1 is the task id

        if changes.title.is_some() {
            params_count += 1;
            query.push_str(&format!(", title = ${}", params_count));
        }
        if changes.description.is_some() {
            params_count += 1;
            query.push_str(&format!(", description = ${}", params_count));
        }
        if changes.due_date.is_some() {
            params_count += 1;
            query.push_str(&format!(", due_date = ${}", params_count));
        }
        if changes.priority.is_some() {
            params_count += 1;
            query.push_str(&format!(", priority = ${}", params_count));
        }
        if changes.status.is_some() {
            params_count += 1;
            query.push_str(&format!(", status = ${}", params_count));
        }
        if changes.assigned_to_id.is_some() {
            params_count += 1;
            query.push_str(&format!(", assigned_to_id = ${}", params_count));
        }

        query.push_str(" WHERE id = $1 RETURNING id");

        let mut db_query = sqlx::query_scalar::<_, Uuid>(&query).bind(id);

        if let Some(title) = changes.title {
            db_query = db_query.bind(title);
        }
        if let Some(description) = changes.description {
            db_query = db_query.bind(description);
        }
        if let Some(due_date) = changes.due_date {
            db_query = db_query.bind(due_date);
        }
        if let Some(priority) = changes.priority {
            db_query = db_query.bind(priority);
        }
        if let Some(status) = changes.status {
            db_query = db_query.bind(status);
        }
        if let Some(assignee) = changes.assigned_to_id {
            db_query = db_query.bind(assignee);
        }

        let updated = db_query.fetch_optional(&self.pool).await?;

        match updated {
            Some(task_id) => self.find_by_id(task_id).await,
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_by_assignee(&self, user_id: Uuid) -> Result<Vec<TaskRecord>> {
        let tasks = sqlx::query_as::<_, TaskRecord>(&format!(
            "{SELECT_TASK} WHERE t.assigned_to_id = $1 ORDER BY t.due_date ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    pub async fn find_by_creator(&self, user_id: Uuid) -> Result<Vec<TaskRecord>> {
        let tasks = sqlx::query_as::<_, TaskRecord>(&format!(
            "{SELECT_TASK} WHERE t.creator_id = $1 ORDER BY t.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    /// System-wide overdue set: due in the past and not yet completed.
    pub async fn find_overdue(&self) -> Result<Vec<TaskRecord>> {
        let tasks = sqlx::query_as::<_, TaskRecord>(&format!(
            "{SELECT_TASK} WHERE t.due_date < NOW() AND t.status <> $1 ORDER BY t.due_date ASC"
        ))
        .bind(TaskStatus::Completed)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(None), "t.created_at");
        assert_eq!(sort_column(Some("createdAt")), "t.created_at");
        assert_eq!(sort_column(Some("dueDate")), "t.due_date");
        assert_eq!(sort_column(Some("priority")), "t.priority");
        assert_eq!(sort_column(Some("title")), "t.title");
        // Arbitrary input never reaches the query text.
        assert_eq!(sort_column(Some("id; DROP TABLE tasks")), "t.created_at");
    }
}
