// Authentication module
// Password hashing, access tokens, refresh tokens and the request extractor

pub mod bearer;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod refresh;
pub mod repository;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, refresh_handler, revoke_handler};
pub use middleware::{authorization_header, AuthenticatedUser};
pub use models::{LoginRequest, LoginResponse, TokenResponse};
pub use repository::RefreshTokenRepository;
pub use service::{blocking, AuthService, TokenPair};
pub use store::{RefreshTokenRecord, RefreshTokenStore};
pub use token::{AccessTokenCodec, TokenSecret, ACCESS_TOKEN_ISSUER};
