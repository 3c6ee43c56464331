//! Public types for the status API
pub use crate::status::{ConnectionState, CorsConfig, DatabaseStatus};
pub use crate::supabase::PolicyInfo;
