//! 业务服务层

pub mod auth_service;
pub mod permission_service;

pub use auth_service::AuthService;
pub use permission_service::require_owner;
