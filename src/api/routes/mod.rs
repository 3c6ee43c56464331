//! API routes module

pub mod calendar;
mod candidates;
pub mod relay;
pub mod status;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Calendar routes
        .nest("/calendar", calendar::router())
        // Candidate roster
        .nest("/candidates", candidates::router())
        // Connection and security status
        .nest("/status", status::router())
}
