//! Comment domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    photo::{Photo, PhotoResponse},
    trimmed,
    user::UserSummary,
};

/// Comment record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub message: String,
    pub photo_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment joined with its author and photo
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithRelationsRow {
    pub id: i64,
    pub message: String,
    pub photo_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_email: String,
    pub user_username: String,
    pub photo_title: String,
    pub photo_caption: Option<String>,
    pub photo_url: String,
    pub photo_user_id: i64,
    pub photo_created_at: DateTime<Utc>,
    pub photo_updated_at: DateTime<Utc>,
}

/// Comment with author and photo preloaded
#[derive(Debug, Clone)]
pub struct CommentWithRelations {
    pub comment: Comment,
    pub user: UserSummary,
    pub photo: Photo,
}

impl From<CommentWithRelationsRow> for CommentWithRelations {
    fn from(row: CommentWithRelationsRow) -> Self {
        Self {
            user: UserSummary {
                id: row.user_id,
                email: row.user_email,
                username: row.user_username,
            },
            photo: Photo {
                id: row.photo_id,
                title: row.photo_title,
                caption: row.photo_caption,
                photo_url: row.photo_url,
                user_id: row.photo_user_id,
                created_at: row.photo_created_at,
                updated_at: row.photo_updated_at,
            },
            comment: Comment {
                id: row.id,
                message: row.message,
                photo_id: row.photo_id,
                user_id: row.user_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200, message = "Message is required (max 200 characters)"))]
    pub message: String,
    #[validate(range(min = 1, message = "photo_id must be a positive id"))]
    pub photo_id: i64,
}

/// Update comment request; the photo a comment belongs to never changes
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200, message = "Message is required (max 200 characters)"))]
    pub message: String,
}

/// Comment response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentResponse {
    pub id: i64,
    pub message: String,
    pub photo_id: i64,
    pub user_id: i64,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            message: comment.message,
            photo_id: comment.photo_id,
            user_id: comment.user_id,
        }
    }
}

/// Comment response with author and photo
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CommentWithRelationsResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub user: UserSummary,
    pub photo: PhotoResponse,
}

impl From<CommentWithRelations> for CommentWithRelationsResponse {
    fn from(view: CommentWithRelations) -> Self {
        Self {
            comment: view.comment.into(),
            user: view.user,
            photo: view.photo.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_request_validation() {
        let req: CreateCommentRequest =
            serde_json::from_str(r#"{"message":"nice shot","photo_id":3}"#).unwrap();
        assert!(req.validate().is_ok());

        let req: CreateCommentRequest =
            serde_json::from_str(r#"{"message":"","photo_id":3}"#).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("message"));

        let long = "x".repeat(201);
        let req = UpdateCommentRequest { message: long };
        assert!(req.validate().is_err());
    }
}
