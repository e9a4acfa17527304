//! HTTP surface for the geoconnector core.
//!
//! Exposes authenticated CRUD collections for every geo entity under
//! `/api/v1/geoconnector/` plus the `/token/` credential exchange.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod resource;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::{build_router, default_registry, Registry, API_PREFIX, TOKEN_PATH};
pub use server::serve;
pub use state::{AppState, SharedState};
