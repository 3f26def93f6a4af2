pub mod auth;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser, OwnerScope};
pub use response::{error_details_middleware, ApiResponse, ApiResult};
