use super::notification_models::Notification;
use super::notification_repository::NotificationRepository;
use crate::error::{AppError, Result};
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    pub async fn get_user_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.repo.find_by_user(user_id).await
    }

    /// Ownership is checked here just like on delete.
    pub async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        self.repo
            .mark_read(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
    }

    pub async fn delete_notification(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let deleted = self.repo.delete(id, user_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    /// Idempotent: deleting when none exist is a success.
    pub async fn delete_all_notifications(&self, user_id: Uuid) -> Result<()> {
        self.repo.delete_all(user_id).await?;
        Ok(())
    }
}
