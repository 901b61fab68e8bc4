// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod docs;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::router;
pub use state::{AppState, AuthSettings};
