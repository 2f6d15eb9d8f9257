//! Estate listings service library.
//!
//! Everything the `estate` binary runs is exposed here so integration tests
//! can drive the real router against an in-memory store.

pub mod config;
pub mod envelope;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod theme;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::build_router;
pub use state::AppState;
