//! Router for the candidate roster

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json};

use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::calendar::Candidate;

type SharedState = Arc<RwLock<AppState>>;

async fn list_candidates(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let supabase = Arc::clone(&state.read().expect("Unable to read share state").supabase);
    let roster = supabase.fetch_candidates().await?;
    Ok(Json(roster))
}

/// Create the candidates router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", axum::routing::get(list_candidates))
}
