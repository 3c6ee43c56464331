//! REST client for the hosted Supabase (PostgREST) project that owns the
//! candidate and appointment tables.
pub mod error;
pub mod models;

pub use error::{FetchError, FetchResult};
pub use models::{PolicyInfo, PostgrestError};

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::calendar::{Appointment, AppointmentSource, Candidate, CandidateSource, MonthWindow};
use crate::core::AppConfig;

pub const APPOINTMENT_TABLE: &str = "hrta_cd00-03_appointment_info";
pub const CANDIDATE_TABLE: &str = "hrta_cd00-01_resume_extraction";
const CANDIDATE_COLUMNS: &str = "candidate_id,first_name,last_name,email";
const RLS_POLICY_RPC: &str = "rpc/check_rls_policies";

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    http: Client,
}

fn query_error(status: StatusCode, body: &str) -> FetchError {
    let parsed = serde_json::from_str::<PostgrestError>(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.clone());
    let message = parsed
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                body.trim().to_string()
            }
        });

    FetchError::Query {
        status: status.as_u16(),
        code,
        message,
    }
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.supabase_url, &config.supabase_anon_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, path: &str) -> FetchResult<Url> {
        if self.base_url.is_empty() || self.anon_key.is_empty() {
            return Err(FetchError::NotConfigured);
        }
        Url::parse(&format!("{}/rest/v1/{}", self.base_url, path))
            .map_err(|e| FetchError::Transport(format!("Invalid project URL: {}", e)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> FetchResult<T> {
        let resp = self.authorized(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(query_error(status, &body));
        }
        Ok(resp.json::<T>().await?)
    }

    /// Appointments whose `appointment_time` falls inside the window,
    /// ordered by time ascending.
    pub async fn fetch_appointments(&self, window: MonthWindow) -> FetchResult<Vec<Appointment>> {
        let mut url = self.rest_url(APPOINTMENT_TABLE)?;
        let start = window.start.to_rfc3339_opts(SecondsFormat::Millis, true);
        let end = window.end.to_rfc3339_opts(SecondsFormat::Millis, true);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("appointment_time", &format!("gte.{}", start))
            .append_pair("appointment_time", &format!("lte.{}", end))
            .append_pair("order", "appointment_time.asc");

        self.send(self.http.get(url)).await
    }

    pub async fn fetch_candidates(&self) -> FetchResult<Vec<Candidate>> {
        let mut url = self.rest_url(CANDIDATE_TABLE)?;
        url.query_pairs_mut().append_pair("select", CANDIDATE_COLUMNS);

        self.send(self.http.get(url)).await
    }

    /// Cheapest possible read against the candidate table.
    pub async fn test_connection(&self) -> FetchResult<()> {
        let mut url = self.rest_url(CANDIDATE_TABLE)?;
        url.query_pairs_mut()
            .append_pair("select", "candidate_id")
            .append_pair("limit", "1");

        let _rows: Vec<serde_json::Value> = self.send(self.http.get(url)).await?;
        tracing::debug!("Supabase connection test successful");
        Ok(())
    }

    /// Row level security summary per table, from a database function
    /// installed alongside the schema.
    pub async fn check_rls_policies(&self) -> FetchResult<Vec<PolicyInfo>> {
        let url = self.rest_url(RLS_POLICY_RPC)?;
        let policies: Option<Vec<PolicyInfo>> = self
            .send(self.http.post(url).json(&serde_json::json!({})))
            .await?;
        Ok(policies.unwrap_or_default())
    }
}

#[async_trait]
impl AppointmentSource for SupabaseClient {
    async fn appointments_between(&self, window: MonthWindow) -> FetchResult<Vec<Appointment>> {
        self.fetch_appointments(window).await
    }
}

#[async_trait]
impl CandidateSource for SupabaseClient {
    async fn candidates(&self) -> FetchResult<Vec<Candidate>> {
        self.fetch_candidates().await
    }
}
