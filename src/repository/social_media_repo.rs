//! Social media repository (PostgreSQL)

use super::SocialMediaRepository;
use crate::{
    error::AppError,
    models::social_media::{SocialMedia, SocialMediaInput, SocialMediaWithUser, SocialMediaWithUserRow},
};
use async_trait::async_trait;
use sqlx::PgPool;

const SELECT_WITH_USER: &str = r#"
    SELECT s.id, s.name, s.social_media_url, s.user_id, s.created_at, s.updated_at,
           u.email AS user_email, u.username AS user_username
    FROM social_medias s
    JOIN users u ON u.id = s.user_id
"#;

pub struct PgSocialMediaRepository {
    db: PgPool,
}

impl PgSocialMediaRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SocialMediaRepository for PgSocialMediaRepository {
    async fn create(&self, user_id: i64, input: SocialMediaInput) -> Result<SocialMedia, AppError> {
        let item = sqlx::query_as::<_, SocialMedia>(
            r#"
            INSERT INTO social_medias (name, social_media_url, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.social_media_url)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>, AppError> {
        let item = sqlx::query_as::<_, SocialMedia>("SELECT * FROM social_medias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(item)
    }

    async fn find_with_user(&self, id: i64) -> Result<Option<SocialMediaWithUser>, AppError> {
        let query = format!("{} WHERE s.id = $1", SELECT_WITH_USER);
        let row = sqlx::query_as::<_, SocialMediaWithUserRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_user_with_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SocialMediaWithUser>, AppError> {
        let query = format!("{} WHERE s.user_id = $1 ORDER BY s.id", SELECT_WITH_USER);
        let rows = sqlx::query_as::<_, SocialMediaWithUserRow>(&query)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: i64,
        input: SocialMediaInput,
    ) -> Result<Option<SocialMedia>, AppError> {
        let item = sqlx::query_as::<_, SocialMedia>(
            r#"
            UPDATE social_medias
            SET name = $2, social_media_url = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.social_media_url)
        .fetch_optional(&self.db)
        .await?;

        Ok(item)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM social_medias WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
