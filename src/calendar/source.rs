//! Read collaborators the calendar pulls its data from.

use async_trait::async_trait;

use super::grid::MonthWindow;
use super::models::{Appointment, Candidate};
use crate::supabase::FetchResult;

#[async_trait]
pub trait AppointmentSource: Send + Sync {
    /// Appointments scheduled inside `window` (inclusive), oldest first
    async fn appointments_between(&self, window: MonthWindow) -> FetchResult<Vec<Appointment>>;
}

#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// The full, unfiltered roster
    async fn candidates(&self) -> FetchResult<Vec<Candidate>>;
}
