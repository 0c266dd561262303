//! 社交媒体 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{AppState, DeferredJson, IdPath, ValidatedJson},
    models::{
        social_media::{SocialMediaRequest, SocialMediaResponse, SocialMediaWithUserResponse},
        ApiResponse, StatusResponse,
    },
    services::require_owner,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

const SOCIAL_MEDIA_NOT_FOUND: &str = "Social media not found";

pub async fn create_social_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<SocialMediaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.repos.social_medias.create(user.id, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SocialMediaResponse::from(item))),
    ))
}

/// 只列出当前用户自己的社交媒体
pub async fn list_social_medias(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let items = state.repos.social_medias.list_by_user_with_user(user.id).await?;

    let data: Vec<SocialMediaWithUserResponse> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(data)))
}

pub async fn get_social_media(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .repos
        .social_medias
        .find_with_user(id)
        .await?
        .ok_or_else(|| AppError::not_found(SOCIAL_MEDIA_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(SocialMediaWithUserResponse::from(item))))
}

pub async fn update_social_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
    body: DeferredJson<SocialMediaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .repos
        .social_medias
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(SOCIAL_MEDIA_NOT_FOUND))?;
    require_owner(&item, &user, "social media")?;
    let req = body.into_inner()?;

    let updated = state
        .repos
        .social_medias
        .update(id, req.into())
        .await?
        .ok_or_else(|| AppError::not_found(SOCIAL_MEDIA_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(SocialMediaResponse::from(updated))))
}

pub async fn delete_social_media(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .repos
        .social_medias
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(SOCIAL_MEDIA_NOT_FOUND))?;
    require_owner(&item, &user, "social media")?;

    if !state.repos.social_medias.delete(id).await? {
        return Err(AppError::not_found(SOCIAL_MEDIA_NOT_FOUND));
    }

    Ok(Json(StatusResponse::success()))
}
