//! Test utilities for integration tests
#![allow(dead_code)]
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use chrono_tz::Tz;
use mockito::{Matcher, Mock, ServerGuard};

use hrdesk::api::AppState;
use hrdesk::api::app;
use hrdesk::core::AppConfig;

/// Creates a test application router talking to the database at
/// `supabase_url`. Pass an empty string for an unconfigured app.
pub fn test_app(supabase_url: &str) -> Router {
    let key = if supabase_url.is_empty() { "" } else { "test-key" };
    let app_config = AppConfig::new(supabase_url, key, Tz::UTC);
    let app_state = AppState::new(app_config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

pub const APPOINTMENTS_PATH: &str = "/rest/v1/hrta_cd00-03_appointment_info";
pub const CANDIDATES_PATH: &str = "/rest/v1/hrta_cd00-01_resume_extraction";

pub const MARCH_APPOINTMENTS: &str = r#"[
    {"id": 1, "candidate_id": "c-1", "appointment_time": "2025-03-10T09:00:00Z", "position_code": "ENG-1"},
    {"id": 2, "candidate_id": "missing", "appointment_time": "2025-03-10T14:30:00Z", "position_code": null},
    {"id": 3, "candidate_id": "c-2", "appointment_time": "2025-03-10T16:00:00Z"},
    {"id": 4, "candidate_id": "c-2", "appointment_time": "garbage"}
]"#;

pub const ROSTER: &str = r#"[
    {"candidate_id": "c-1", "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"},
    {"candidate_id": "c-2", "first_name": "Grace", "last_name": "Hopper", "email": "grace@example.com"}
]"#;

pub async fn mock_json(server: &mut ServerGuard, method: &str, path: &str, status: usize, body: &str) -> Mock {
    server
        .mock(method, path)
        .match_query(Matcher::Any)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
