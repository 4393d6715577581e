//! HTTP server module.
//!
//! Application state, router configuration, and liveness endpoints.

pub mod health;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
