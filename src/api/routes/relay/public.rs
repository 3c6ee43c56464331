//! Public types for the health check and CORS relay
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request to forward through `/proxy`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProxyRequest {
    pub url: Option<String>,
    pub method: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub body: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub cors: String,
}

#[derive(Serialize, Deserialize)]
pub struct NotFoundResponse {
    pub error: String,
    pub available_endpoints: Vec<String>,
}
