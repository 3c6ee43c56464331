use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Nullable text columns read as empty strings
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An interview slot as stored in the appointment table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    // Empty when the row has no candidate, which matches nobody
    #[serde(default, deserialize_with = "null_as_empty")]
    pub candidate_id: String,
    // Stored rows occasionally have no time yet
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(default)]
    pub position_code: Option<String>,
}

/// Projection of the resume extraction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "candidate_id", default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// An appointment with its candidate attached when the roster has one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub candidate: Option<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub appointments: Vec<MergedAppointment>,
}

/// One line of a day cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub id: i64,
    // `HH:MM` in the display zone, or "No time"
    pub label: String,
    pub candidate_name: Option<String>,
}

/// What a day cell actually shows: the first few entries and how many
/// were left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPreview {
    pub entries: Vec<PreviewEntry>,
    pub remaining: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

/// Notification emitted by a click on the calendar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionEvent {
    DateSelected { date: NaiveDate },
    AppointmentSelected { appointment: MergedAppointment },
}
