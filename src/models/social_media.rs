//! Social media link models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{trimmed, user::UserSummary};

/// Social media link owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SocialMedia {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialMediaWithUserRow {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_email: String,
    pub user_username: String,
}

#[derive(Debug, Clone)]
pub struct SocialMediaWithUser {
    pub social_media: SocialMedia,
    pub user: UserSummary,
}

impl From<SocialMediaWithUserRow> for SocialMediaWithUser {
    fn from(row: SocialMediaWithUserRow) -> Self {
        Self {
            user: UserSummary {
                id: row.user_id,
                email: row.user_email,
                username: row.user_username,
            },
            social_media: SocialMedia {
                id: row.id,
                name: row.name,
                social_media_url: row.social_media_url,
                user_id: row.user_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SocialMediaInput {
    pub name: String,
    pub social_media_url: String,
}

/// Create/update social media request
#[derive(Debug, Deserialize, Validate)]
pub struct SocialMediaRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 50, message = "Name is required (max 50 characters)"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(url(message = "Invalid social media URL"))]
    pub social_media_url: String,
}

impl From<SocialMediaRequest> for SocialMediaInput {
    fn from(req: SocialMediaRequest) -> Self {
        Self {
            name: req.name,
            social_media_url: req.social_media_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialMediaResponse {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
}

impl From<SocialMedia> for SocialMediaResponse {
    fn from(item: SocialMedia) -> Self {
        Self {
            id: item.id,
            name: item.name,
            social_media_url: item.social_media_url,
            user_id: item.user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SocialMediaWithUserResponse {
    #[serde(flatten)]
    pub social_media: SocialMediaResponse,
    pub user: UserSummary,
}

impl From<SocialMediaWithUser> for SocialMediaWithUserResponse {
    fn from(view: SocialMediaWithUser) -> Self {
        Self {
            social_media: view.social_media.into(),
            user: view.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_media_request_validation() {
        let req: SocialMediaRequest = serde_json::from_str(
            r#"{"name":"instagram","social_media_url":"https://instagram.com/ana"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let req: SocialMediaRequest =
            serde_json::from_str(r#"{"name":"instagram","social_media_url":"ana"}"#).unwrap();
        assert!(req
            .validate()
            .unwrap_err()
            .field_errors()
            .contains_key("social_media_url"));
    }
}
