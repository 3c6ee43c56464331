use std::sync::Arc;

use chrono::Utc;

use crate::calendar::CalendarViewModel;
use crate::core::AppConfig;
use crate::supabase::SupabaseClient;

pub struct AppState {
    pub config: AppConfig,
    pub supabase: Arc<SupabaseClient>,
    // Calendar shown on the dashboard, shared by every client
    pub calendar: Arc<CalendarViewModel>,
    // Used by the CORS relay for outbound requests
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let today = Utc::now().with_timezone(&config.timezone).date_naive();
        let supabase = Arc::new(SupabaseClient::from_config(&config));
        let calendar = Arc::new(CalendarViewModel::new(
            supabase.clone(),
            supabase.clone(),
            config.timezone,
            today,
            Some(today),
        ));

        Self {
            config,
            supabase,
            calendar,
            http: reqwest::Client::new(),
        }
    }

    /// Drop the current database client and build a fresh one from the
    /// configuration. The calendar switches to the new client for its
    /// next reload and keeps what it already shows.
    pub fn reset_connection(&mut self) {
        tracing::info!("Resetting Supabase connection");
        self.supabase = Arc::new(SupabaseClient::from_config(&self.config));
        self.calendar
            .replace_sources(self.supabase.clone(), self.supabase.clone());
    }
}
