use thiserror::Error;

use crate::supabase::FetchError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalendarError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid appointment timestamp '{0}'")]
    Timestamp(String),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
