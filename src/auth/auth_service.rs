use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::user::user_models::{User, UserResponse, UserSummary};
use crate::user::user_repository::UserRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_days: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_days: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl_days,
        }
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<(User, String)> {
        // Exact-match lookup, same casing the client sent.
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = self.user_repo.create(email, &password_hash, name).await?;
        let token = create_token(user.id, &self.jwt_secret, self.token_ttl_days)?;

        Ok((user, token))
    }

    /// Unknown email and wrong password produce the same error so callers
    /// cannot probe which half was wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = create_token(user.id, &self.jwt_secret, self.token_ttl_days)?;

        Ok((user, token))
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn update_profile(&self, user_id: Uuid, name: &str) -> Result<UserResponse> {
        let user = self.user_repo.update_name(user_id, name).await?;
        Ok(user.into())
    }

    pub async fn get_all_users(&self) -> Result<Vec<UserSummary>> {
        self.user_repo.find_all().await
    }
}
