pub mod auth;
pub mod authorize;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthAccount};
pub use authorize::{authorize_middleware, AuthorizationGate, UNAUTHORIZED_PATH};
pub use response::{ApiResponse, ApiResult};
