//! 数据访问层
//! 每类记录一个仓储 trait，PostgreSQL 与内存两种实现

pub mod comment_repo;
pub mod memory;
pub mod photo_repo;
pub mod social_media_repo;
pub mod user_repo;

pub use comment_repo::PgCommentRepository;
pub use memory::MemoryStore;
pub use photo_repo::PgPhotoRepository;
pub use social_media_repo::PgSocialMediaRepository;
pub use user_repo::PgUserRepository;

use crate::{
    error::AppError,
    models::{
        comment::{Comment, CommentWithRelations},
        photo::{Photo, PhotoInput, PhotoWithUser},
        social_media::{SocialMedia, SocialMediaInput, SocialMediaWithUser},
        user::{NewUser, User, UserChanges},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError>;
    /// 删除用户及其照片、评论、社交媒体
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// 照片仓储
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create(&self, user_id: i64, input: PhotoInput) -> Result<Photo, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, AppError>;
    async fn find_with_user(&self, id: i64) -> Result<Option<PhotoWithUser>, AppError>;
    async fn list_with_user(&self, limit: i64, offset: i64) -> Result<Vec<PhotoWithUser>, AppError>;
    async fn update(&self, id: i64, input: PhotoInput) -> Result<Option<Photo>, AppError>;
    /// 删除照片及其评论
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// 评论仓储
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, user_id: i64, photo_id: i64, message: String) -> Result<Comment, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;
    async fn find_with_relations(&self, id: i64) -> Result<Option<CommentWithRelations>, AppError>;
    async fn list_with_relations(&self) -> Result<Vec<CommentWithRelations>, AppError>;
    async fn update(&self, id: i64, message: String) -> Result<Option<Comment>, AppError>;
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// 社交媒体仓储
#[async_trait]
pub trait SocialMediaRepository: Send + Sync {
    async fn create(&self, user_id: i64, input: SocialMediaInput) -> Result<SocialMedia, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>, AppError>;
    async fn find_with_user(&self, id: i64) -> Result<Option<SocialMediaWithUser>, AppError>;
    async fn list_by_user_with_user(&self, user_id: i64)
        -> Result<Vec<SocialMediaWithUser>, AppError>;
    async fn update(&self, id: i64, input: SocialMediaInput)
        -> Result<Option<SocialMedia>, AppError>;
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// 仓储集合，挂在 AppState 上
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub social_medias: Arc<dyn SocialMediaRepository>,
}

impl Repositories {
    /// PostgreSQL 实现
    pub fn postgres(db: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            photos: Arc::new(PgPhotoRepository::new(db.clone())),
            comments: Arc::new(PgCommentRepository::new(db.clone())),
            social_medias: Arc::new(PgSocialMediaRepository::new(db)),
        }
    }

    /// 内存实现（本地运行与测试）
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            photos: store.clone(),
            comments: store.clone(),
            social_medias: store,
        }
    }
}

pub(crate) const EMAIL_TAKEN: &str = "Email is already registered";
pub(crate) const USERNAME_TAKEN: &str = "Username is already taken";

/// 唯一约束冲突映射为 409，其余数据库错误原样返回
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = match db_err.constraint() {
                Some(c) if c.contains("email") => EMAIL_TAKEN,
                Some(c) if c.contains("username") => USERNAME_TAKEN,
                _ => "Record already exists",
            };
            return AppError::conflict(message);
        }
    }
    AppError::Database(err)
}
