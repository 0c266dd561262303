//! 健康检查处理器

use axum::Json;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// 存活探针响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// 记录启动时间（main 中尽早调用）
pub fn mark_start() {
    Lazy::force(&START_TIME);
}

pub fn uptime_secs() -> u64 {
    START_TIME.elapsed().as_secs()
}

/// 存活探针，不检查依赖
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime_secs(),
    })
}
