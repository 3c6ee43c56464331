use std::env;

use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    // Calendar days are computed in this zone
    pub timezone: Tz,
}

impl AppConfig {
    pub fn new(supabase_url: &str, supabase_anon_key: &str, timezone: Tz) -> Self {
        Self {
            supabase_url: supabase_url.trim().to_string(),
            supabase_anon_key: supabase_anon_key.trim().to_string(),
            timezone,
        }
    }

    /// True when both connection settings are present and the URL is an
    /// absolute http(s) URL. Nothing is sent over the network.
    pub fn is_configured(&self) -> bool {
        if self.supabase_url.is_empty() || self.supabase_anon_key.is_empty() {
            return false;
        }
        match reqwest::Url::parse(&self.supabase_url) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
            Err(_) => false,
        }
    }
}

fn env_with_fallback(primary: &str, fallback: &str) -> String {
    env::var(primary)
        .or_else(|_| env::var(fallback))
        .unwrap_or_default()
}

fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!("Unknown time zone '{}', falling back to UTC", name);
        Tz::UTC
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        let supabase_url = env_with_fallback("HRDESK_SUPABASE_URL", "SUPABASE_URL");
        let supabase_anon_key =
            env_with_fallback("HRDESK_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY");
        let timezone = env::var("HRDESK_TIMEZONE")
            .map(|name| parse_timezone(&name))
            .unwrap_or(Tz::UTC);

        Self::new(&supabase_url, &supabase_anon_key, timezone)
    }
}
