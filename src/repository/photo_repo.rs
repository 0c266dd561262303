//! Photo repository (PostgreSQL)

use super::PhotoRepository;
use crate::{
    error::AppError,
    models::photo::{Photo, PhotoInput, PhotoWithUser, PhotoWithUserRow},
};
use async_trait::async_trait;
use sqlx::PgPool;

const SELECT_WITH_USER: &str = r#"
    SELECT p.id, p.title, p.caption, p.photo_url, p.user_id, p.created_at, p.updated_at,
           u.email AS user_email, u.username AS user_username
    FROM photos p
    JOIN users u ON u.id = p.user_id
"#;

pub struct PgPhotoRepository {
    db: PgPool,
}

impl PgPhotoRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn create(&self, user_id: i64, input: PhotoInput) -> Result<Photo, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (title, caption, photo_url, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.caption)
        .bind(&input.photo_url)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(photo)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(photo)
    }

    async fn find_with_user(&self, id: i64) -> Result<Option<PhotoWithUser>, AppError> {
        let query = format!("{} WHERE p.id = $1", SELECT_WITH_USER);
        let row = sqlx::query_as::<_, PhotoWithUserRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_with_user(&self, limit: i64, offset: i64) -> Result<Vec<PhotoWithUser>, AppError> {
        let query = format!("{} ORDER BY p.id LIMIT $1 OFFSET $2", SELECT_WITH_USER);
        let rows = sqlx::query_as::<_, PhotoWithUserRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, input: PhotoInput) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
            SET title = $2, caption = $3, photo_url = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.caption)
        .bind(&input.photo_url)
        .fetch_optional(&self.db)
        .await?;

        Ok(photo)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
