use crate::auth::auth_service::AuthService;
use crate::db::DbPool;
use crate::notification::notification_service::NotificationService;
use crate::task::task_service::TaskService;
use crate::websocket::ConnectionManager;
use std::sync::Arc;

/// Everything the handlers need, constructed once in `main`.
/// No module-level singletons anywhere else in the crate.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub ws_connections: ConnectionManager,
    pub auth_service: AuthService,
    pub task_service: TaskService,
    pub notification_service: NotificationService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_days: std::env::var("TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("TOKEN_TTL_DAYS must be a number"),
            production: std::env::var("APP_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),
        }
    }
}
