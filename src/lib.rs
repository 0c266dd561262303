//! mygram 照片分享服务
//! 用户、照片、评论、社交媒体的 REST 后端

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
