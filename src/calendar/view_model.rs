//! Stateful calendar backing the appointment view.
//!
//! The view-model owns the displayed month, the selected date and the
//! month's working set. Every refresh takes a generation ticket under
//! the state lock; when the fetches complete, the result is only applied
//! if no newer refresh has started in the meantime, so the last
//! requested month always wins regardless of completion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::error::CalendarResult;
use super::grid::{grid_for, month_window};
use super::merge::merge_appointments;
use super::models::{CalendarDay, Direction, MergedAppointment, SelectionEvent};
use super::source::{AppointmentSource, CandidateSource};

/// Fetch a month's appointments and the roster concurrently and join
/// them. Used by the view-model and by one-off month lookups.
pub async fn fetch_month(
    appointments: &dyn AppointmentSource,
    candidates: &dyn CandidateSource,
    month: NaiveDate,
    tz: Tz,
) -> CalendarResult<Vec<MergedAppointment>> {
    let window = month_window(month, tz);
    tracing::debug!(
        "Fetching appointments between {} and {}",
        window.start,
        window.end
    );

    let (rows, roster) = tokio::try_join!(
        appointments.appointments_between(window),
        candidates.candidates()
    )?;

    Ok(merge_appointments(rows, roster))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { appointments: usize },
    // A newer refresh started before this one finished
    Superseded,
}

#[derive(Debug)]
struct ViewState {
    month: NaiveDate,
    selected: Option<NaiveDate>,
    working_set: Arc<Vec<MergedAppointment>>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

/// Point-in-time copy of the view state
#[derive(Debug, Clone, Serialize)]
pub struct CalendarSnapshot {
    pub month: NaiveDate,
    pub selected: Option<NaiveDate>,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    pub working_set: Arc<Vec<MergedAppointment>>,
}

#[derive(Clone)]
struct Sources {
    appointments: Arc<dyn AppointmentSource>,
    candidates: Arc<dyn CandidateSource>,
}

/// Clears `loading` when a refresh ends, including when its future is
/// dropped before the fetches complete. A newer refresh owns the flag
/// once it has taken a later generation.
struct LoadingGuard<'a> {
    state: &'a Mutex<ViewState>,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.loading = false;
        }
    }
}

pub struct CalendarViewModel {
    sources: Mutex<Sources>,
    tz: Tz,
    state: Mutex<ViewState>,
}

impl CalendarViewModel {
    pub fn new(
        appointments: Arc<dyn AppointmentSource>,
        candidates: Arc<dyn CandidateSource>,
        tz: Tz,
        month: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Self {
        Self {
            sources: Mutex::new(Sources {
                appointments,
                candidates,
            }),
            tz,
            state: Mutex::new(ViewState {
                month,
                selected,
                working_set: Arc::new(Vec::new()),
                loading: false,
                error: None,
                generation: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sources(&self) -> Sources {
        self.sources
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Point later refreshes at new collaborators. The displayed month,
    /// the selection and the loaded working set are kept.
    pub fn replace_sources(
        &self,
        appointments: Arc<dyn AppointmentSource>,
        candidates: Arc<dyn CandidateSource>,
    ) {
        *self.sources.lock().unwrap_or_else(PoisonError::into_inner) = Sources {
            appointments,
            candidates,
        };
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn month(&self) -> NaiveDate {
        self.state().month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.state().selected
    }

    pub fn working_set(&self) -> Arc<Vec<MergedAppointment>> {
        Arc::clone(&self.state().working_set)
    }

    pub fn snapshot(&self) -> CalendarSnapshot {
        let state = self.state();
        CalendarSnapshot {
            month: state.month,
            selected: state.selected,
            loading: state.loading,
            error: state.error.clone(),
            working_set: Arc::clone(&state.working_set),
        }
    }

    /// Reload the working set for the displayed month.
    pub async fn refresh(&self) -> CalendarResult<RefreshOutcome> {
        let (generation, month) = {
            let mut state = self.state();
            state.generation += 1;
            state.loading = true;
            (state.generation, state.month)
        };

        let _loading = LoadingGuard {
            state: &self.state,
            generation,
        };

        let sources = self.sources();
        let result = fetch_month(
            sources.appointments.as_ref(),
            sources.candidates.as_ref(),
            month,
            self.tz,
        )
        .await;

        let mut state = self.state();
        if state.generation != generation {
            tracing::warn!(
                "Discarding refresh for {} superseded by a newer request",
                month.format("%Y-%m")
            );
            return Ok(RefreshOutcome::Superseded);
        }

        state.loading = false;
        match result {
            Ok(merged) => {
                let count = merged.len();
                state.working_set = Arc::new(merged);
                state.error = None;
                Ok(RefreshOutcome::Applied {
                    appointments: count,
                })
            }
            Err(e) => {
                tracing::error!("Error fetching appointments: {}", e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Display the month containing `month` and reload.
    pub async fn show_month(&self, month: NaiveDate) -> CalendarResult<RefreshOutcome> {
        self.state().month = month;
        self.refresh().await
    }

    /// Move one month back or forward, clamping the day of month when
    /// the target month is shorter, then reload.
    pub async fn navigate(&self, direction: Direction) -> CalendarResult<RefreshOutcome> {
        {
            let mut state = self.state();
            let shifted = match direction {
                Direction::Prev => state.month.checked_sub_months(Months::new(1)),
                Direction::Next => state.month.checked_add_months(Months::new(1)),
            };
            if let Some(month) = shifted {
                state.month = month;
            }
        }
        self.refresh().await
    }

    pub fn grid(&self, today: NaiveDate) -> Vec<CalendarDay> {
        let state = self.state();
        grid_for(
            state.month,
            state.selected,
            today,
            &state.working_set,
            self.tz,
        )
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// A click on a day cell.
    pub fn select_date(&self, date: NaiveDate) -> SelectionEvent {
        self.state().selected = Some(date);
        SelectionEvent::DateSelected { date }
    }

    /// A click on an entry inside a day cell. Only the appointment is
    /// reported; the containing day is not selected.
    pub fn select_appointment(&self, appointment_id: i64) -> Option<SelectionEvent> {
        let working_set = self.working_set();
        working_set
            .iter()
            .find(|entry| entry.appointment.id == appointment_id)
            .cloned()
            .map(|appointment| SelectionEvent::AppointmentSelected { appointment })
    }
}
