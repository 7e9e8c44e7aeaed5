// Chirps module
// Posting, listing and deleting chirps

pub mod filter;
pub mod handlers;
pub mod models;
pub mod repository;

pub use handlers::{
    create_chirp_handler, delete_chirp_handler, get_chirp_handler, list_chirps_handler,
};
pub use models::{Chirp, CreateChirpRequest};
pub use repository::ChirpRepository;
