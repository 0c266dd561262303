//! 内存仓储
//! 单把读写锁保护全部表，级联删除与唯一约束语义与 PostgreSQL 实现一致

use super::{
    CommentRepository, PhotoRepository, SocialMediaRepository, UserRepository, EMAIL_TAKEN,
    USERNAME_TAKEN,
};
use crate::{
    error::AppError,
    models::{
        comment::{Comment, CommentWithRelations},
        photo::{Photo, PhotoInput, PhotoWithUser},
        social_media::{SocialMedia, SocialMediaInput, SocialMediaWithUser},
        user::{NewUser, User, UserChanges, UserSummary},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    photos: BTreeMap<i64, Photo>,
    comments: BTreeMap<i64, Comment>,
    social_medias: BTreeMap<i64, SocialMedia>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// 检查邮箱（不区分大小写）与用户名唯一性，`except` 为正在更新的用户
    fn check_unique(&self, email: &str, username: &str, except: Option<i64>) -> Result<(), AppError> {
        for user in self.users.values() {
            if Some(user.id) == except {
                continue;
            }
            if user.email.eq_ignore_ascii_case(email) {
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
            if user.username == username {
                return Err(AppError::conflict(USERNAME_TAKEN));
            }
        }
        Ok(())
    }

    fn summary(&self, user_id: i64) -> Option<UserSummary> {
        self.users.get(&user_id).map(UserSummary::from)
    }

    fn photo_with_user(&self, photo: &Photo) -> Option<PhotoWithUser> {
        Some(PhotoWithUser {
            user: self.summary(photo.user_id)?,
            photo: photo.clone(),
        })
    }

    fn comment_with_relations(&self, comment: &Comment) -> Option<CommentWithRelations> {
        Some(CommentWithRelations {
            user: self.summary(comment.user_id)?,
            photo: self.photos.get(&comment.photo_id)?.clone(),
            comment: comment.clone(),
        })
    }

    fn social_media_with_user(&self, item: &SocialMedia) -> Option<SocialMediaWithUser> {
        Some(SocialMediaWithUser {
            user: self.summary(item.user_id)?,
            social_media: item.clone(),
        })
    }

    fn delete_photo_cascade(&mut self, photo_id: i64) -> bool {
        let removed = self.photos.remove(&photo_id).is_some();
        if removed {
            self.comments.retain(|_, c| c.photo_id != photo_id);
        }
        removed
    }
}

/// 内存存储，同时实现四个仓储 trait
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_unique(&user.email, &user.username, None)?;

        let now = Utc::now();
        let record = User {
            id: tables.allocate_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            profile_image_url: user.profile_image_url,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        tables.check_unique(&changes.email, &changes.username, Some(id))?;

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.username = changes.username;
        user.email = changes.email;
        user.age = changes.age;
        user.profile_image_url = changes.profile_image_url;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        let owned_photos: Vec<i64> = tables
            .photos
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for photo_id in owned_photos {
            tables.delete_photo_cascade(photo_id);
        }
        tables.comments.retain(|_, c| c.user_id != id);
        tables.social_medias.retain(|_, s| s.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PhotoRepository for MemoryStore {
    async fn create(&self, user_id: i64, input: PhotoInput) -> Result<Photo, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let photo = Photo {
            id: tables.allocate_id(),
            title: input.title,
            caption: input.caption,
            photo_url: input.photo_url,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.photos.insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, AppError> {
        Ok(self.tables.read().await.photos.get(&id).cloned())
    }

    async fn find_with_user(&self, id: i64) -> Result<Option<PhotoWithUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.photos.get(&id).and_then(|p| tables.photo_with_user(p)))
    }

    async fn list_with_user(&self, limit: i64, offset: i64) -> Result<Vec<PhotoWithUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|p| tables.photo_with_user(p))
            .collect())
    }

    async fn update(&self, id: i64, input: PhotoInput) -> Result<Option<Photo>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(photo) = tables.photos.get_mut(&id) else {
            return Ok(None);
        };
        photo.title = input.title;
        photo.caption = input.caption;
        photo.photo_url = input.photo_url;
        photo.updated_at = Utc::now();
        Ok(Some(photo.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.delete_photo_cascade(id))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, user_id: i64, photo_id: i64, message: String) -> Result<Comment, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.photos.contains_key(&photo_id) {
            return Err(AppError::not_found("Photo not found"));
        }

        let now = Utc::now();
        let comment = Comment {
            id: tables.allocate_id(),
            message,
            photo_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn find_with_relations(&self, id: i64) -> Result<Option<CommentWithRelations>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .get(&id)
            .and_then(|c| tables.comment_with_relations(c)))
    }

    async fn list_with_relations(&self) -> Result<Vec<CommentWithRelations>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter_map(|c| tables.comment_with_relations(c))
            .collect())
    }

    async fn update(&self, id: i64, message: String) -> Result<Option<Comment>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.get_mut(&id) else {
            return Ok(None);
        };
        comment.message = message;
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl SocialMediaRepository for MemoryStore {
    async fn create(&self, user_id: i64, input: SocialMediaInput) -> Result<SocialMedia, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let item = SocialMedia {
            id: tables.allocate_id(),
            name: input.name,
            social_media_url: input.social_media_url,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.social_medias.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>, AppError> {
        Ok(self.tables.read().await.social_medias.get(&id).cloned())
    }

    async fn find_with_user(&self, id: i64) -> Result<Option<SocialMediaWithUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_medias
            .get(&id)
            .and_then(|s| tables.social_media_with_user(s)))
    }

    async fn list_by_user_with_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SocialMediaWithUser>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .social_medias
            .values()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| tables.social_media_with_user(s))
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        input: SocialMediaInput,
    ) -> Result<Option<SocialMedia>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.social_medias.get_mut(&id) else {
            return Ok(None);
        };
        item.name = input.name;
        item.social_media_url = input.social_media_url;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.social_medias.remove(&id).is_some())
    }
}
