//! Admin-facing import service for the Cinevault media catalog.
//!
//! Exposes `POST /import` (bearer-authenticated) to run one import batch
//! synchronously and `GET /health` as a liveness probe. All pipeline logic
//! lives in `cinevault-core`; this crate is wiring: config, state, routes,
//! auth, and error mapping.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod routes;

pub use infra::{app_state::AppState, config::Config};
pub use routes::create_router;
