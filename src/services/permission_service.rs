//! 所有权检查
//! 照片、评论、社交媒体只允许创建者修改或删除

use crate::{error::AppError, models::user::User};

/// 可按所有者鉴权的记录
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for crate::models::photo::Photo {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl Owned for crate::models::comment::Comment {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

impl Owned for crate::models::social_media::SocialMedia {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

/// 当前用户不是记录所有者时返回 403
pub fn require_owner<R: Owned>(record: &R, user: &User, resource: &str) -> Result<(), AppError> {
    if record.owner_id() != user.id {
        tracing::warn!(
            user_id = user.id,
            owner_id = record.owner_id(),
            resource = %resource,
            "Ownership check failed"
        );
        return Err(AppError::Forbidden(format!(
            "You are not allowed to modify this {}",
            resource
        )));
    }

    Ok(())
}
