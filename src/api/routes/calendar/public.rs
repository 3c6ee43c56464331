//! Public types for the calendar API
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDay, Direction, PreviewEntry};

#[derive(Deserialize)]
pub struct CalendarQuery {
    /// `YYYY-MM`; when set the month is looked up without touching the
    /// shared calendar
    pub month: Option<String>,
    pub selected: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub date: Option<NaiveDate>,
    pub appointment_id: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: i64,
    pub label: String,
    pub candidate_name: Option<String>,
}

impl From<PreviewEntry> for CalendarEntry {
    fn from(entry: PreviewEntry) -> Self {
        Self {
            id: entry.id,
            label: entry.label,
            candidate_name: entry.candidate_name,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CalendarDayResponse {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub appointment_count: usize,
    pub entries: Vec<CalendarEntry>,
    // Entries left out of `entries`
    pub remaining: usize,
}

impl CalendarDayResponse {
    pub fn new(day: &CalendarDay, tz: chrono_tz::Tz) -> Self {
        let preview = crate::calendar::day_preview(day, tz);
        Self {
            date: day.date,
            is_current_month: day.is_current_month,
            is_today: day.is_today,
            is_selected: day.is_selected,
            appointment_count: day.appointments.len(),
            entries: preview.entries.into_iter().map(CalendarEntry::from).collect(),
            remaining: preview.remaining,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CalendarResponse {
    pub month: String,
    pub title: String,
    pub selected: Option<NaiveDate>,
    pub loading: bool,
    pub error: Option<String>,
    pub days: Vec<CalendarDayResponse>,
}
