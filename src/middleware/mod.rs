pub mod auth;
pub mod tracing;

pub use auth::{AdminUser, CurrentUser};
pub use self::tracing::request_id_middleware;
