use super::task_dto::{CreateTaskRequest, TaskQuery, UpdateTaskRequest};
use super::task_models::TaskResponse;
use super::task_service::DashboardStats;
use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
    websocket::{TaskDeletedPayload, WsEvent},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Create a task. Broadcasts `task:created`; the assignee (if any) also gets
/// `task:assigned` and `notification:new` on their private channel.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let task = state.task_service.create_task(payload, user_id).await?;

    state
        .ws_connections
        .broadcast(WsEvent::TaskCreated(task.clone()));
    if let Some(assignee) = task.assigned_to_id {
        state
            .ws_connections
            .send_to_user(&assignee, WsEvent::TaskAssigned(task.clone()));
        state
            .ws_connections
            .send_to_user(&assignee, WsEvent::NotificationNew);
    }

    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

/// All tasks, optionally filtered and sorted
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(
        ("status" = Option<String>, Query, description = "Filter by status (human-readable form)"),
        ("priority" = Option<String>, Query, description = "Filter by priority"),
        ("sortBy" = Option<String>, Query, description = "Sort key, defaults to creation time")
    ),
    responses(
        (status = 200, description = "List of tasks"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<TaskQuery>,
) -> Result<impl IntoResponse> {
    let tasks = state.task_service.get_all_tasks(query).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

/// Dashboard stats for the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/tasks/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard stats", body = DashboardStats),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DashboardStats>> {
    let stats = state.task_service.get_dashboard_stats(user_id).await?;
    Ok(Json(stats))
}

/// Get a single task by id
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.get_task_by_id(task_id).await?;
    Ok(Json(json!({ "task": task })))
}

/// Patch a task. Broadcasts `task:updated`; a newly set assignee also gets
/// the targeted events.
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let assigned_in_patch = matches!(payload.assigned_to_id, Some(Some(_)));

    let task = state
        .task_service
        .update_task(task_id, payload, user_id)
        .await?;

    state
        .ws_connections
        .broadcast(WsEvent::TaskUpdated(task.clone()));
    if assigned_in_patch {
        if let Some(assignee) = task.assigned_to_id {
            state
                .ws_connections
                .send_to_user(&assignee, WsEvent::TaskAssigned(task.clone()));
            state
                .ws_connections
                .send_to_user(&assignee, WsEvent::NotificationNew);
        }
    }

    Ok(Json(json!({ "task": task })))
}

/// Delete a task (creator only). Broadcasts `task:deleted`.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Task not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.task_service.delete_task(task_id, user_id).await?;

    state
        .ws_connections
        .broadcast(WsEvent::TaskDeleted(TaskDeletedPayload { id: task_id }));

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
