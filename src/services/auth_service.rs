//! 认证服务：注册、登录、令牌刷新

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::{
        auth::{IssuedTokens, LoginRequest},
        user::{normalize_email, NewUser, RegisterRequest, User},
    },
    repository::{UserRepository, EMAIL_TAKEN, USERNAME_TAKEN},
};
use std::sync::Arc;

/// 未知邮箱与错误密码共用同一提示
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            hasher,
            jwt_service,
        }
    }

    /// 注册新用户，请求体已通过校验
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&req.email);
        let username = req.username;

        // 先查一遍给出明确提示，最终由唯一约束兜底
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict(USERNAME_TAKEN));
        }

        let password_hash = self.hasher.hash_blocking(req.password).await?;

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash,
                age: req.age,
                profile_image_url: req.profile_image_url,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    /// 用户登录，成功后签发访问令牌与刷新令牌
    pub async fn login(&self, req: LoginRequest) -> Result<IssuedTokens, AppError> {
        let email = normalize_email(&req.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login rejected: unknown email");
                return Err(AppError::authentication(INVALID_CREDENTIALS));
            }
        };

        let verified = self
            .hasher
            .verify_blocking(user.password_hash.clone(), req.password)
            .await?;
        if !verified {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let pair = self.jwt_service.generate_token_pair(user.id)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(IssuedTokens {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// 用刷新令牌换取新的访问令牌
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let user_id = self.jwt_service.validate_refresh_token(refresh_token)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::authentication("user no longer exists"));
        }

        Ok(self.jwt_service.generate_access_token(user_id)?)
    }
}
