use crate::{
    auth::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest},
    auth::auth_handlers,
    middleware::auth_middleware,
    notification::notification_handlers,
    notification::Notification,
    state::AppState,
    task::task_dto::{CreateTaskRequest, UpdateTaskRequest},
    task::task_handlers,
    task::task_service::DashboardStats,
    task::{TaskPriority, TaskResponse, TaskStatus},
    user::{UserResponse, UserSummary},
    websocket::{ws_handler, TaskDeletedPayload},
};
use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::me,
        auth_handlers::update_profile,
        auth_handlers::get_users,
        task_handlers::create_task,
        task_handlers::get_tasks,
        task_handlers::get_dashboard_stats,
        task_handlers::get_task,
        task_handlers::update_task,
        task_handlers::delete_task,
        notification_handlers::get_notifications,
        notification_handlers::mark_notification_read,
        notification_handlers::delete_notification,
        notification_handlers::delete_all_notifications,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            AuthResponse,
            UserResponse,
            UserSummary,
            CreateTaskRequest,
            UpdateTaskRequest,
            TaskResponse,
            TaskStatus,
            TaskPriority,
            DashboardStats,
            Notification,
            TaskDeletedPayload,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, profile"),
        (name = "users", description = "User directory"),
        (name = "tasks", description = "Task management"),
        (name = "notifications", description = "Notifications")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public entry points
    let auth_public = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout));

    let auth_protected = Router::new()
        .route("/me", get(auth_handlers::me))
        .route("/profile", patch(auth_handlers::update_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let user_routes = Router::new()
        .route("/", get(auth_handlers::get_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            get(task_handlers::get_tasks).post(task_handlers::create_task),
        )
        .route("/dashboard/stats", get(task_handlers::get_dashboard_stats))
        .route(
            "/:id",
            get(task_handlers::get_task)
                .patch(task_handlers::update_task)
                .delete(task_handlers::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let notification_routes = Router::new()
        .route(
            "/",
            get(notification_handlers::get_notifications)
                .delete(notification_handlers::delete_all_notifications),
        )
        .route(
            "/:id/read",
            patch(notification_handlers::mark_notification_read),
        )
        .route("/:id", delete(notification_handlers::delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The socket handler authenticates at handshake itself.
    let api_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_protected))
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes)
        .route("/ws", get(ws_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .with_state(state)
}
