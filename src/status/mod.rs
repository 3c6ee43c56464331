//! Connection and security status of the hosted database.

use serde::Serialize;

use crate::core::AppConfig;
use crate::supabase::{FetchError, PolicyInfo, SupabaseClient};

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH";
pub const CORS_ALLOW_HEADERS: &str =
    "Content-Type, Authorization, X-Requested-With, Accept, Origin, X-Client-Info, apikey";
pub const CORS_MAX_AGE_SECS: u32 = 86400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Checking,
    Connected,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: String,
    pub allowed_methods: String,
    pub allowed_headers: String,
    pub max_age_secs: u32,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: CORS_ALLOW_ORIGIN.to_string(),
            allowed_methods: CORS_ALLOW_METHODS.to_string(),
            allowed_headers: CORS_ALLOW_HEADERS.to_string(),
            max_age_secs: CORS_MAX_AGE_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseStatus {
    pub configured: bool,
    pub connection: ConnectionState,
    pub error: Option<String>,
    pub policies: Vec<PolicyInfo>,
    pub cors: CorsConfig,
}

impl DatabaseStatus {
    fn failed(configured: bool, error: String) -> Self {
        Self {
            configured,
            connection: ConnectionState::Failed,
            error: Some(error),
            policies: vec![],
            cors: CorsConfig::default(),
        }
    }
}

/// Turn a failed connectivity test into something an operator can act
/// on.
pub fn describe_connection_error(err: &FetchError) -> String {
    match err {
        FetchError::NotConfigured => err.to_string(),
        FetchError::Transport(_) => String::from(
            "Cannot reach Supabase server. This usually means:\n\n\
             • The Supabase project URL is incorrect\n\
             • The Supabase project is paused or deleted\n\
             • Network connectivity issues",
        ),
        FetchError::Query {
            code: Some(code), ..
        } if code == "PGRST301" => String::from(
            "Cannot connect to Supabase. Please check your project URL and ensure the project is not paused.",
        ),
        FetchError::Query { message, .. } => format!("Database error: {}", message),
        FetchError::Decode(_) => format!("Database error: {}", err),
    }
}

/// Run the connectivity test, mapping failures to operator guidance.
pub async fn test_connectivity(client: &SupabaseClient) -> Result<(), String> {
    client.test_connection().await.map_err(|e| {
        tracing::error!("Supabase connection test failed: {}", e);
        describe_connection_error(&e)
    })
}

pub async fn check_database_status(config: &AppConfig, client: &SupabaseClient) -> DatabaseStatus {
    if !config.is_configured() {
        return DatabaseStatus::failed(false, String::from("Supabase not configured"));
    }

    if let Err(message) = test_connectivity(client).await {
        return DatabaseStatus::failed(true, message);
    }

    // Missing policy info is not a reason to report the database as down
    let policies = match client.check_rls_policies().await {
        Ok(policies) => policies,
        Err(e) => {
            tracing::warn!("Could not fetch RLS policies: {}", e);
            vec![]
        }
    };

    DatabaseStatus {
        configured: true,
        connection: ConnectionState::Connected,
        error: None,
        policies,
        cors: CorsConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use mockito::Matcher;

    #[test]
    fn it_describes_connection_errors() {
        let unreachable = describe_connection_error(&FetchError::Transport("dns".into()));
        assert!(unreachable.starts_with("Cannot reach Supabase server."));

        let paused = describe_connection_error(&FetchError::Query {
            status: 401,
            code: Some("PGRST301".into()),
            message: "JWT expired".into(),
        });
        assert!(paused.contains("not paused"));

        let query = describe_connection_error(&FetchError::Query {
            status: 404,
            code: Some("42P01".into()),
            message: "relation does not exist".into(),
        });
        assert_eq!(query, "Database error: relation does not exist");
    }

    #[tokio::test]
    async fn it_reports_unconfigured_projects() {
        let config = AppConfig::new("", "", Tz::UTC);
        let client = SupabaseClient::from_config(&config);

        let status = check_database_status(&config, &client).await;
        assert!(!status.configured);
        assert_eq!(status.connection, ConnectionState::Failed);
        assert_eq!(status.error.as_deref(), Some("Supabase not configured"));
    }

    #[tokio::test]
    async fn it_reports_connected_projects_with_policies() {
        let mut server = mockito::Server::new_async().await;
        let _connection_check = server
            .mock("GET", "/rest/v1/hrta_cd00-01_resume_extraction")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"candidate_id": "c-1"}]"#)
            .create_async()
            .await;
        let _rpc = server
            .mock("POST", "/rest/v1/rpc/check_rls_policies")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"table_name": "hrta_cd00-03_appointment_info", "rls_enabled": false, "policy_count": 0}]"#)
            .create_async()
            .await;

        let config = AppConfig::new(&server.url(), "test-key", Tz::UTC);
        let client = SupabaseClient::from_config(&config);
        let status = check_database_status(&config, &client).await;

        assert_eq!(status.connection, ConnectionState::Connected);
        assert!(status.error.is_none());
        assert_eq!(status.policies.len(), 1);
        assert!(!status.policies[0].rls_enabled);
        assert_eq!(status.cors.allowed_origins, "*");
    }

    #[tokio::test]
    async fn it_stays_connected_when_the_policy_report_fails() {
        let mut server = mockito::Server::new_async().await;
        let _connection_check = server
            .mock("GET", "/rest/v1/hrta_cd00-01_resume_extraction")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let _rpc = server
            .mock("POST", "/rest/v1/rpc/check_rls_policies")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": "PGRST202", "message": "Could not find the function"}"#)
            .create_async()
            .await;

        let config = AppConfig::new(&server.url(), "test-key", Tz::UTC);
        let client = SupabaseClient::from_config(&config);
        let status = check_database_status(&config, &client).await;

        assert_eq!(status.connection, ConnectionState::Connected);
        assert!(status.policies.is_empty());
    }

    #[tokio::test]
    async fn it_reports_failed_connections() {
        let mut server = mockito::Server::new_async().await;
        let _connection_check = server
            .mock("GET", "/rest/v1/hrta_cd00-01_resume_extraction")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": "PGRST301", "message": "JWT expired"}"#)
            .create_async()
            .await;

        let config = AppConfig::new(&server.url(), "test-key", Tz::UTC);
        let client = SupabaseClient::from_config(&config);
        let status = check_database_status(&config, &client).await;

        assert!(status.configured);
        assert_eq!(status.connection, ConnectionState::Failed);
        assert!(status.error.unwrap().contains("not paused"));
    }
}
