pub mod config;
pub mod dto;
pub mod error;
pub mod health;
pub mod routes;
pub mod score_lookup;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
