pub mod jwt;
pub mod password;

pub use jwt::{AdminUser, AuthUser, Claims, JwtKeys};
