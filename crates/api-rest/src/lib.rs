//! REST API for the complaint registration system.
//!
//! Exposes the directory and creation endpoints consumed by the client
//! registration workflow, with OpenAPI documentation served at
//! `/swagger-ui`. The router is built by [`router`] so the server binary
//! and the integration tests share one construction path.

pub mod error;
pub mod routes;
pub mod state;

pub use routes::{router, ApiDoc};
pub use state::AppState;
