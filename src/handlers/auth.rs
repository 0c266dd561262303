//! 认证相关 HTTP 处理器：注册、登录、刷新、登出

use crate::{
    auth::middleware::ACCESS_TOKEN_COOKIE,
    config::SecurityConfig,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::{
        auth::{LoginRequest, LoginResponse},
        user::{RegisterRequest, UserResponse},
        ApiResponse, StatusResponse,
    },
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const LOGGED_IN_COOKIE: &str = "logged_in";

fn build_cookie(
    name: &'static str,
    value: String,
    max_age_mins: i64,
    http_only: bool,
    config: &SecurityConfig,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .max_age(time::Duration::minutes(max_age_mins))
        .http_only(http_only)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserResponse::from(user))),
    ))
}

/// 登录，令牌同时写入 Cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth_service.login(req).await?;
    let security = &state.config.security;

    let jar = jar
        .add(build_cookie(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            security.access_token_max_age_mins,
            true,
            security,
        ))
        .add(build_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token,
            security.refresh_token_max_age_mins,
            true,
            security,
        ))
        .add(build_cookie(
            LOGGED_IN_COOKIE,
            "true".to_string(),
            security.access_token_max_age_mins,
            false,
            security,
        ));

    Ok((jar, Json(LoginResponse::new(tokens.access_token))))
}

/// 用 refresh_token Cookie 换取新的访问令牌
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::authentication("missing token"))?;

    let access_token = state
        .auth_service
        .refresh(&refresh_token)
        .await
        .map_err(|e| match e {
            AppError::Token(ref t) if t.is_rejection() => AppError::authentication("invalid token"),
            other => other,
        })?;
    let security = &state.config.security;

    let jar = jar
        .add(build_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token.clone(),
            security.access_token_max_age_mins,
            true,
            security,
        ))
        .add(build_cookie(
            LOGGED_IN_COOKIE,
            "true".to_string(),
            security.access_token_max_age_mins,
            false,
            security,
        ));

    Ok((jar, Json(LoginResponse::new(access_token))))
}

/// 登出：清除全部认证 Cookie
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .add(expired_cookie(ACCESS_TOKEN_COOKIE))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE))
        .add(expired_cookie(LOGGED_IN_COOKIE));

    (jar, Json(StatusResponse::success()))
}
