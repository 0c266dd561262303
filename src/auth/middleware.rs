//! 认证中间件
//! 从 Authorization 头或 access_token Cookie 提取令牌，校验后加载当前用户

use crate::{
    auth::jwt::JwtService, error::AppError, middleware::AppState, models::user::User,
    repository::UserRepository,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 已认证用户（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

// 实现 FromRequestParts 以便在 handler 中直接提取 CurrentUser
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 提取令牌：Bearer 头优先，其次 access_token Cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|s| !s.is_empty())
}

/// 认证流程：令牌 -> 用户 ID -> 用户记录
pub async fn authenticate(
    headers: &HeaderMap,
    jwt_service: &JwtService,
    users: &dyn UserRepository,
) -> Result<User, AppError> {
    let token = extract_token(headers).ok_or_else(|| AppError::authentication("missing token"))?;

    let user_id = jwt_service
        .validate_access_token(&token)
        .map_err(|_| AppError::authentication("invalid token"))?;

    users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id, "Token subject no longer exists");
            AppError::authentication("user no longer exists")
        })
}

/// 认证中间件 - 必须认证
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(
        req.headers(),
        &state.jwt_service,
        state.repos.users.as_ref(),
    )
    .await?;

    // 附加到请求扩展
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
