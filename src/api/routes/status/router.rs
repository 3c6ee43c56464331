//! Router for the status API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};

use super::public::DatabaseStatus;
use crate::api::state::AppState;
use crate::status::check_database_status;

type SharedState = Arc<RwLock<AppState>>;

async fn get_status(State(state): State<SharedState>) -> Json<DatabaseStatus> {
    let (config, supabase) = {
        let shared_state = state.read().expect("Unable to read share state");
        (shared_state.config.clone(), Arc::clone(&shared_state.supabase))
    };
    Json(check_database_status(&config, &supabase).await)
}

/// Rebuild the database client and test it again
async fn reset_connection(State(state): State<SharedState>) -> Json<DatabaseStatus> {
    let (config, supabase) = {
        let mut shared_state = state.write().expect("Unable to write share state");
        shared_state.reset_connection();
        (shared_state.config.clone(), Arc::clone(&shared_state.supabase))
    };
    Json(check_database_status(&config, &supabase).await)
}

/// Create the status router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(get_status))
        .route("/reset", axum::routing::post(reset_connection))
}
