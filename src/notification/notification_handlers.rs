use super::notification_models::Notification;
use crate::{error::Result, middleware::AuthUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

/// Notifications for the authenticated user, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let notifications = state
        .notification_service
        .get_user_notifications(user_id)
        .await?;

    Ok(Json(json!({ "notifications": notifications })))
}

/// Mark one notification as read
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked as read", body = Notification),
        (status = 404, description = "Not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state.notification_service.mark_as_read(id, user_id).await?;
    Ok(Json(json!({ "notification": notification })))
}

/// Delete one notification
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .notification_service
        .delete_notification(id, user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete every notification owned by the user
#[utoipa::path(
    delete,
    path = "/api/v1/notifications",
    responses(
        (status = 204, description = "All deleted"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    state
        .notification_service
        .delete_all_notifications(user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
