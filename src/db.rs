//! 存储初始化
//! PostgreSQL 连接池、嵌入迁移，以及按配置选择存储后端

use crate::{
    config::{AppConfig, DatabaseConfig},
    error::AppError,
    repository::Repositories,
};
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    tracing::debug!("Creating database connection pool...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(config.url.expose_secret())
        .await
        .inspect_err(|e| tracing::error!("Failed to create database pool: {}", e))?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// 运行嵌入的迁移（users / photos / comments / social_medias）
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        tracing::error!("Migration failed: {}", e);
        AppError::Database(sqlx::Error::Migrate(Box::new(e)))
    })?;

    tracing::info!("Migrations completed");
    Ok(())
}

/// 按 `storage.backend` 构建仓储；postgres 后端会先完成迁移
pub async fn connect_storage(config: &AppConfig) -> Result<Repositories, AppError> {
    if config.storage.is_memory() {
        tracing::warn!("Using in-memory storage; data is lost on restart");
        return Ok(Repositories::in_memory());
    }

    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database initialized");

    Ok(Repositories::postgres(pool))
}
