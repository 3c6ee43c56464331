//! Interview appointment calendar
pub mod error;
pub mod grid;
pub mod merge;
pub mod models;
pub mod source;
pub mod view_model;

pub use error::{CalendarError, CalendarResult};
pub use grid::{MonthWindow, PREVIEW_LIMIT, day_preview, grid_for, month_window};
pub use merge::merge_appointments;
pub use models::*;
pub use source::{AppointmentSource, CandidateSource};
pub use view_model::{CalendarSnapshot, CalendarViewModel, RefreshOutcome, fetch_month};
