//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{auth::middleware::require_auth, handlers, middleware::AppState};

/// 请求体上限
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/users/register", post(handlers::auth::register))
        .route("/users/login", post(handlers::auth::login))
        .route("/users/refresh", post(handlers::auth::refresh))
        .route("/users/logout", post(handlers::auth::logout));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route(
            "/users",
            axum::routing::put(handlers::user::update_me).delete(handlers::user::delete_me),
        )
        .route(
            "/photos",
            get(handlers::photo::list_photos).post(handlers::photo::create_photo),
        )
        .route(
            "/photos/{id}",
            get(handlers::photo::get_photo)
                .put(handlers::photo::update_photo)
                .delete(handlers::photo::delete_photo),
        )
        .route(
            "/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route(
            "/comments/{id}",
            get(handlers::comment::get_comment)
                .put(handlers::comment::update_comment)
                .delete(handlers::comment::delete_comment),
        )
        .route(
            "/socialmedias",
            get(handlers::social_media::list_social_medias)
                .post(handlers::social_media::create_social_media),
        )
        .route(
            "/socialmedias/{id}",
            get(handlers::social_media::get_social_media)
                .put(handlers::social_media::update_social_media)
                .delete(handlers::social_media::delete_social_media),
        )
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = cors_layer(&state.config.server.cors_origin_list());

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 允许携带 Cookie 的跨域配置，非法的 origin 会被忽略
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
