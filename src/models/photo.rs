//! Photo domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{empty_string_as_none, trimmed, user::UserSummary};

/// Default and maximum page sizes for photo listings
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;
/// Keeps `(page - 1) * limit` well inside i64
pub const MAX_PAGE: i64 = 1_000_000;

/// Photo record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Photo joined with its owner, as read by the listing queries
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhotoWithUserRow {
    pub id: i64,
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_email: String,
    pub user_username: String,
}

/// Photo with its owner preloaded
#[derive(Debug, Clone)]
pub struct PhotoWithUser {
    pub photo: Photo,
    pub user: UserSummary,
}

impl From<PhotoWithUserRow> for PhotoWithUser {
    fn from(row: PhotoWithUserRow) -> Self {
        Self {
            user: UserSummary {
                id: row.user_id,
                email: row.user_email,
                username: row.user_username,
            },
            photo: Photo {
                id: row.id,
                title: row.title,
                caption: row.caption,
                photo_url: row.photo_url,
                user_id: row.user_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

/// Fields written on create and update
#[derive(Debug, Clone)]
pub struct PhotoInput {
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
}

/// Create/update photo request
#[derive(Debug, Deserialize, Validate)]
pub struct PhotoRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Title is required (max 100 characters)"))]
    pub title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 200, message = "Caption must be at most 200 characters"))]
    pub caption: Option<String>,
    #[serde(deserialize_with = "trimmed")]
    #[validate(url(message = "Invalid photo URL"))]
    pub photo_url: String,
}

impl From<PhotoRequest> for PhotoInput {
    fn from(req: PhotoRequest) -> Self {
        Self {
            title: req.title,
            caption: req.caption,
            photo_url: req.photo_url,
        }
    }
}

/// Pagination query for `GET /photos`
#[derive(Debug, Deserialize, Validate)]
pub struct PhotoListQuery {
    #[validate(range(min = 1, max = 1_000_000, message = "page must be between 1 and 1000000"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl PhotoListQuery {
    /// (limit, offset) for the repository
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        (limit, (page - 1) * limit)
    }
}

/// Photo response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoResponse {
    pub id: i64,
    pub title: String,
    pub caption: Option<String>,
    pub photo_url: String,
    pub user_id: i64,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: photo.user_id,
        }
    }
}

/// Photo response with the owner summary
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PhotoWithUserResponse {
    #[serde(flatten)]
    pub photo: PhotoResponse,
    pub user: UserSummary,
}

impl From<PhotoWithUser> for PhotoWithUserResponse {
    fn from(view: PhotoWithUser) -> Self {
        Self {
            photo: view.photo.into(),
            user: view.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_request_validation() {
        let req: PhotoRequest = serde_json::from_str(
            r#"{"title":"sunset","caption":"","photo_url":"https://img.example/1.jpg"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.caption.is_none());

        let req: PhotoRequest =
            serde_json::from_str(r#"{"title":"","photo_url":"https://img.example/1.jpg"}"#).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));

        let req: PhotoRequest =
            serde_json::from_str(r#"{"title":"   ","photo_url":"https://img.example/1.jpg"}"#).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("title"));

        let req: PhotoRequest =
            serde_json::from_str(r#"{"title":"sunset","photo_url":"img"}"#).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("photo_url"));
    }

    #[test]
    fn test_list_query_defaults() {
        let query = PhotoListQuery { page: None, limit: None };
        assert!(query.validate().is_ok());
        assert_eq!(query.limit_offset(), (10, 0));

        let query = PhotoListQuery { page: Some(3), limit: Some(20) };
        assert_eq!(query.limit_offset(), (20, 40));
    }

    #[test]
    fn test_list_query_rejects_out_of_range() {
        let query = PhotoListQuery { page: Some(0), limit: None };
        assert!(query.validate().is_err());

        let query = PhotoListQuery { page: None, limit: Some(500) };
        assert!(query.validate().is_err());

        let query = PhotoListQuery { page: Some(i64::MAX), limit: Some(100) };
        assert!(query.validate().is_err());
        assert_eq!(query.limit_offset(), (100, (MAX_PAGE - 1) * 100));
    }

    #[test]
    fn test_response_flattens_owner() {
        let now = Utc::now();
        let view = PhotoWithUser {
            photo: Photo {
                id: 7,
                title: "sunset".to_string(),
                caption: None,
                photo_url: "https://img.example/1.jpg".to_string(),
                user_id: 1,
                created_at: now,
                updated_at: now,
            },
            user: UserSummary {
                id: 1,
                email: "ana@x.com".to_string(),
                username: "ana".to_string(),
            },
        };
        let body = serde_json::to_value(PhotoWithUserResponse::from(view)).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["user_id"], 1);
        assert_eq!(body["user"]["username"], "ana");
    }
}
