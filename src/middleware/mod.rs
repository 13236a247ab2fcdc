pub mod auth;
pub mod cors;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser, PUBLIC_PATHS};
pub use cors::cors_layer;
pub use response::{ApiResponse, ApiResult};
