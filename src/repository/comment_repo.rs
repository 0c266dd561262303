//! Comment repository (PostgreSQL)

use super::CommentRepository;
use crate::{
    error::AppError,
    models::comment::{Comment, CommentWithRelations, CommentWithRelationsRow},
};
use async_trait::async_trait;
use sqlx::PgPool;

const SELECT_WITH_RELATIONS: &str = r#"
    SELECT c.id, c.message, c.photo_id, c.user_id, c.created_at, c.updated_at,
           u.email AS user_email, u.username AS user_username,
           p.title AS photo_title, p.caption AS photo_caption, p.photo_url,
           p.user_id AS photo_user_id, p.created_at AS photo_created_at,
           p.updated_at AS photo_updated_at
    FROM comments c
    JOIN users u ON u.id = c.user_id
    JOIN photos p ON p.id = c.photo_id
"#;

pub struct PgCommentRepository {
    db: PgPool,
}

impl PgCommentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, user_id: i64, photo_id: i64, message: String) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (message, photo_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&message)
        .bind(photo_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            // 照片在检查之后被删除
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found("Photo not found");
                }
            }
            AppError::Database(e)
        })?;

        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(comment)
    }

    async fn find_with_relations(&self, id: i64) -> Result<Option<CommentWithRelations>, AppError> {
        let query = format!("{} WHERE c.id = $1", SELECT_WITH_RELATIONS);
        let row = sqlx::query_as::<_, CommentWithRelationsRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_with_relations(&self) -> Result<Vec<CommentWithRelations>, AppError> {
        let query = format!("{} ORDER BY c.id", SELECT_WITH_RELATIONS);
        let rows = sqlx::query_as::<_, CommentWithRelationsRow>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, message: String) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET message = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&message)
        .fetch_optional(&self.db)
        .await?;

        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
