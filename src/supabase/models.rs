use serde::{Deserialize, Serialize};

/// Error body returned by PostgREST when a query is rejected
#[derive(Debug, Deserialize)]
pub struct PostgrestError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

/// Row returned by the `check_rls_policies` RPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyInfo {
    pub table_name: String,
    pub rls_enabled: bool,
    pub policy_count: i64,
}
