//! Router for the health check and the stateless CORS relay

use std::sync::{Arc, RwLock};

use axum::body::Bytes;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, extract::State};
use chrono::{SecondsFormat, Utc};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};

use super::public;
use crate::api::public::{ApiError, client_error};
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

const AVAILABLE_ENDPOINTS: [&str; 5] = [
    "/health",
    "/proxy",
    "/api/calendar",
    "/api/candidates",
    "/api/status",
];

async fn health() -> Json<public::HealthResponse> {
    Json(public::HealthResponse {
        status: String::from("healthy"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        cors: String::from("enabled"),
    })
}

/// Forward a request described in the JSON body and hand the upstream
/// status and body back untouched.
async fn proxy(State(state): State<SharedState>, body: Bytes) -> Result<Response, ApiError> {
    let request: public::ProxyRequest = serde_json::from_slice(&body)?;

    let Some(url) = request.url.filter(|url| !url.is_empty()) else {
        return Ok(client_error(StatusCode::BAD_REQUEST, "URL is required"));
    };
    let method = request
        .method
        .as_deref()
        .filter(|method| !method.is_empty())
        .unwrap_or("GET")
        .to_uppercase();
    let method = Method::from_bytes(method.as_bytes())?;

    let http = state.read().expect("Unable to read share state").http.clone();
    let mut outbound = http.request(method.clone(), &url);
    for (name, value) in request.headers.unwrap_or_default() {
        outbound = outbound.header(name, value);
    }
    if let Some(payload) = request.body {
        outbound = outbound.body(serde_json::to_string(&payload)?);
    }

    tracing::debug!("Relaying {} {}", method, url);
    let upstream = outbound.send().await?;
    let status = upstream.status();
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let bytes = upstream.bytes().await?;

    Ok((status, [(CONTENT_TYPE, content_type)], bytes).into_response())
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(public::NotFoundResponse {
            error: String::from("Endpoint not found"),
            available_endpoints: AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }),
    )
        .into_response()
}

/// Create the relay router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::any(health))
        .route("/health", axum::routing::any(health))
        .route(
            "/proxy",
            axum::routing::post(proxy).fallback(not_found),
        )
}
