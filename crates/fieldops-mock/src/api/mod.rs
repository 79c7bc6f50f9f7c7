//! REST API of the mock services.

pub mod drones;
mod error;
pub mod fields;
pub mod missions;
pub mod planner;
mod routes;

pub use error::ApiError;

use axum::Router;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    routes::create_router()
}

#[cfg(test)]
mod tests;
