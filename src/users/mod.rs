// Users module
// Account registration and credential updates

pub mod handlers;
pub mod models;
pub mod repository;

pub use handlers::{create_user_handler, update_user_handler};
pub use models::{User, UserCredentials, UserResponse};
pub use repository::UserRepository;
