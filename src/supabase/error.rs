//! Errors raised while talking to the hosted database.

use thiserror::Error;

/// Failure of a single read against the REST API. Every variant is
/// recoverable: callers surface it as an error state and carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Supabase client not configured. Please set up your Supabase connection.")]
    NotConfigured,

    #[error("Failed to fetch: {0}")]
    Transport(String),

    #[error("Query error: {message}")]
    Query {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
