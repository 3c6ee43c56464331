//! Month grid arithmetic and per-day bucketing.
//!
//! Weeks start on Sunday. All "local" dates are taken in the display
//! zone handed in by the caller, never the process zone.

use std::collections::BTreeMap;

use chrono::{
    DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

use super::error::{CalendarError, CalendarResult};
use super::models::{CalendarDay, DayPreview, MergedAppointment, PreviewEntry};

/// Entries shown per day cell before collapsing into a "+N more" count
pub const PREVIEW_LIMIT: usize = 2;

/// Instants bounding a month, used as the appointment fetch filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

pub fn month_start(month: NaiveDate) -> NaiveDate {
    month - Days::new(u64::from(month.day0()))
}

pub fn month_end(month: NaiveDate) -> NaiveDate {
    let first = month_start(month);
    first + Days::new(u64::from(days_in_month(first.year(), first.month()) - 1))
}

/// Sunday on or before the first of the month through Saturday on or
/// after the last of the month, inclusive.
pub fn grid_range(month: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = month_start(month);
    let last = month_end(month);
    let lead = first.weekday().num_days_from_sunday();
    let trail = 6 - last.weekday().num_days_from_sunday();
    (
        first - Days::new(u64::from(lead)),
        last + Days::new(u64::from(trail)),
    )
}

fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// First instant of the month through its last millisecond, in `tz`.
pub fn month_window(month: NaiveDate, tz: Tz) -> MonthWindow {
    let start = local_midnight(month_start(month), tz);
    let next_month = month_end(month) + Days::new(1);
    let end = local_midnight(next_month, tz) - Duration::milliseconds(1);
    MonthWindow {
        start: start.with_timezone(&Utc),
        end: end.with_timezone(&Utc),
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Postgres text output uses a space separator and may shorten the
/// offset: `2025-03-10 14:30:00+00` becomes `2025-03-10T14:30:00+00:00`.
fn normalize_postgres(value: &str) -> Option<String> {
    let (date, time) = value.split_once(' ')?;
    let sign_at = time.rfind(['+', '-'])?;
    let (clock, offset) = time.split_at(sign_at);
    if offset.len() == 3 {
        Some(format!("{date}T{clock}{offset}:00"))
    } else {
        Some(format!("{date}T{clock}{offset}"))
    }
}

/// Interpret a stored ISO-8601 timestamp in the display zone. Values
/// without an offset are read as wall-clock time in `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> CalendarResult<DateTime<Tz>> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CalendarError::Timestamp(raw.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&tz));
    }
    if let Some(normalized) = normalize_postgres(value)
        && let Ok(dt) = DateTime::parse_from_rfc3339(&normalized)
    {
        return Ok(dt.with_timezone(&tz));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt)
            && let Some(dt) = tz.from_local_datetime(&naive).earliest()
        {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(local_midnight(date, tz));
    }

    Err(CalendarError::Timestamp(raw.to_string()))
}

/// Local calendar date of an appointment, or `None` when it has no
/// usable timestamp.
pub fn local_date(entry: &MergedAppointment, tz: Tz) -> Option<NaiveDate> {
    let raw = entry.appointment.appointment_time.as_deref()?;
    match parse_timestamp(raw, tz) {
        Ok(dt) => Some(dt.date_naive()),
        Err(e) => {
            tracing::debug!("Skipping appointment {}: {}", entry.appointment.id, e);
            None
        }
    }
}

/// Group the working set by local date, keeping fetch order inside each
/// day. Entries without a parsable timestamp land in no bucket.
pub fn bucket_by_day(
    working_set: &[MergedAppointment],
    tz: Tz,
) -> BTreeMap<NaiveDate, Vec<MergedAppointment>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<MergedAppointment>> = BTreeMap::new();
    for entry in working_set {
        if let Some(date) = local_date(entry, tz) {
            buckets.entry(date).or_default().push(entry.clone());
        }
    }
    buckets
}

pub fn grid_for(
    month: NaiveDate,
    selected: Option<NaiveDate>,
    today: NaiveDate,
    working_set: &[MergedAppointment],
    tz: Tz,
) -> Vec<CalendarDay> {
    let (start, end) = grid_range(month);
    let mut buckets = bucket_by_day(working_set, tz);

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarDay {
            date,
            is_current_month: date.year() == month.year() && date.month() == month.month(),
            is_today: date == today,
            is_selected: selected == Some(date),
            appointments: buckets.remove(&date).unwrap_or_default(),
        })
        .collect()
}

fn time_label(entry: &MergedAppointment, tz: Tz) -> String {
    entry
        .appointment
        .appointment_time
        .as_deref()
        .and_then(|raw| parse_timestamp(raw, tz).ok())
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| String::from("No time"))
}

pub fn day_preview(day: &CalendarDay, tz: Tz) -> DayPreview {
    let entries = day
        .appointments
        .iter()
        .take(PREVIEW_LIMIT)
        .map(|entry| PreviewEntry {
            id: entry.appointment.id,
            label: time_label(entry, tz),
            candidate_name: entry.candidate.as_ref().map(|c| c.full_name()),
        })
        .collect();

    DayPreview {
        entries,
        remaining: day.appointments.len().saturating_sub(PREVIEW_LIMIT),
    }
}
