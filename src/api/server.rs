use std::any::Any;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware};
use http::StatusCode;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::cors::cors_headers;
use super::public::ErrorBody;
use super::routes;
use crate::api::state::AppState;
use crate::core::AppConfig;

/// Unhandled panics still answer with the JSON error body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        String::from("Unknown error")
    };
    tracing::error!("Request handler panicked: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: String::from("Internal server error"),
            message: Some(message),
        }),
    )
        .into_response()
}

pub fn app(shared_state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        // API routes
        .nest("/api", routes::router())
        // Health check and CORS relay
        .merge(routes::relay::router())
        .fallback(routes::relay::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors_headers))
        .with_state(Arc::clone(&shared_state))
}

pub fn init_tracing() {
    // `try_init` so repeated calls (tests, CLI subcommands) are harmless
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    init_tracing();

    if !config.is_configured() {
        tracing::warn!("Supabase environment variables not found, data routes will fail");
    }

    let app_state = AppState::new(config);
    let calendar = Arc::clone(&app_state.calendar);
    let shared_state = Arc::new(RwLock::new(app_state));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    // Load the current month in the background so the first request
    // doesn't wait on the database
    tokio::spawn(async move {
        if let Err(e) = calendar.refresh().await {
            tracing::error!("Initial calendar load failed: {}", e);
        }
    });

    axum::serve(listener, app).await?;
    Ok(())
}
