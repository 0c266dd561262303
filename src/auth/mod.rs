//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError, TokenPair};
pub use middleware::{extract_token, require_auth, CurrentUser};
pub use password::PasswordHasher;
