//! HTTP 处理器模块

pub mod auth;
pub mod comment;
pub mod health;
pub mod photo;
pub mod social_media;
pub mod user;
