use super::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::{
    error::Result,
    middleware::AuthUser,
    state::AppState,
    user::{UserResponse, UserSummary},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

/// Session cookie mirroring the bearer token: HttpOnly, SameSite=None+Secure
/// in production (cross-site SPA), Lax otherwise.
fn token_cookie(token: &str, ttl_days: i64, production: bool) -> String {
    let max_age = ttl_days * 24 * 60 * 60;
    if production {
        format!("token={token}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=None; Secure")
    } else {
        format!("token={token}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=Lax")
    }
}

fn clear_cookie(production: bool) -> String {
    if production {
        "token=; HttpOnly; Path=/; Max-Age=0; SameSite=None; Secure".to_string()
    } else {
        "token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax".to_string()
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (user, token) = state
        .auth_service
        .register(&payload.email, &payload.password, &payload.name)
        .await?;

    let cookie = token_cookie(&token, state.config.token_ttl_days, state.config.production);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (user, token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    let cookie = token_cookie(&token, state.config.token_ttl_days, state.config.production);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Logout (clear session cookie)
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Logged out")),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_cookie(state.config.production))],
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.get_user_by_id(user_id).await?;
    Ok(Json(json!({ "user": user })))
}

/// Update the display name
#[utoipa::path(
    patch,
    path = "/api/v1/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state
        .auth_service
        .update_profile(user_id, &payload.name)
        .await?;

    Ok(Json(json!({ "user": user })))
}

/// Directory of all users, for the assignee picker
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_users(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<UserSummary>>> {
    let users = state.auth_service.get_all_users().await?;
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cookie_attributes() {
        let dev = token_cookie("abc", 7, false);
        assert!(dev.starts_with("token=abc;"));
        assert!(dev.contains("HttpOnly"));
        assert!(dev.contains("Max-Age=604800"));
        assert!(dev.contains("SameSite=Lax"));
        assert!(!dev.contains("Secure"));

        let prod = token_cookie("abc", 7, true);
        assert!(prod.contains("SameSite=None"));
        assert!(prod.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_cookie(false).contains("Max-Age=0"));
    }
}
