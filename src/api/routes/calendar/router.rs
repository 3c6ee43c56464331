//! Router for the calendar API

use std::sync::{Arc, RwLock};

use axum::response::{IntoResponse, Response};
use axum::{Json, Router, extract::State};
use axum_extra::extract::Query;
use chrono::NaiveDate;
use chrono_tz::Tz;
use http::StatusCode;

use super::public;
use crate::api::public::client_error;
use crate::api::state::AppState;
use crate::calendar::{
    CalendarDay, CalendarViewModel, MergedAppointment, fetch_month, grid_for,
};

type SharedState = Arc<RwLock<AppState>>;

fn parse_month(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").ok()
}

fn calendar_response(
    month: NaiveDate,
    selected: Option<NaiveDate>,
    loading: bool,
    error: Option<String>,
    days: &[CalendarDay],
    tz: Tz,
) -> public::CalendarResponse {
    public::CalendarResponse {
        month: month.format("%Y-%m").to_string(),
        title: month.format("%B %Y").to_string(),
        selected,
        loading,
        error,
        days: days
            .iter()
            .map(|day| public::CalendarDayResponse::new(day, tz))
            .collect(),
    }
}

fn current_view(calendar: &CalendarViewModel) -> public::CalendarResponse {
    let snapshot = calendar.snapshot();
    let days = calendar.grid(calendar.today());
    calendar_response(
        snapshot.month,
        snapshot.selected,
        snapshot.loading,
        snapshot.error,
        &days,
        calendar.timezone(),
    )
}

fn shared_calendar(state: &SharedState) -> Arc<CalendarViewModel> {
    Arc::clone(&state.read().expect("Unable to read share state").calendar)
}

async fn get_calendar(
    State(state): State<SharedState>,
    Query(params): Query<public::CalendarQuery>,
) -> Response {
    let calendar = shared_calendar(&state);

    if params.month.is_none() && params.selected.is_none() {
        return Json(current_view(&calendar)).into_response();
    }

    let month = match params.month.as_deref() {
        Some(value) => match parse_month(value) {
            Some(month) => month,
            None => {
                return client_error(
                    StatusCode::BAD_REQUEST,
                    "Invalid month, expected YYYY-MM",
                );
            }
        },
        None => calendar.month(),
    };

    let supabase = Arc::clone(&state.read().expect("Unable to read share state").supabase);
    let tz = calendar.timezone();
    let (status, merged, error) =
        match fetch_month(supabase.as_ref(), supabase.as_ref(), month, tz).await {
            Ok(merged) => (StatusCode::OK, merged, None),
            Err(e) => {
                tracing::error!("Calendar lookup for {} failed: {}", month.format("%Y-%m"), e);
                (StatusCode::BAD_GATEWAY, vec![], Some(e.to_string()))
            }
        };
    let days = grid_for(month, params.selected, calendar.today(), &merged, tz);

    (
        status,
        Json(calendar_response(month, params.selected, false, error, &days, tz)),
    )
        .into_response()
}

/// The view after a reload. A failed reload still returns the view so
/// the caller can show the error state.
fn reloaded_view<T, E: std::fmt::Display>(
    calendar: &CalendarViewModel,
    result: Result<T, E>,
) -> Response {
    let status = match result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Calendar reload failed: {}", e);
            StatusCode::BAD_GATEWAY
        }
    };
    (status, Json(current_view(calendar))).into_response()
}

// Reloads run on their own task so a dropped connection can't cancel
// them halfway through
async fn navigate(
    State(state): State<SharedState>,
    Json(payload): Json<public::NavigateRequest>,
) -> Response {
    let calendar = shared_calendar(&state);
    let reload = tokio::spawn({
        let calendar = Arc::clone(&calendar);
        async move { calendar.navigate(payload.direction).await }
    });
    let result = reload
        .await
        .map_err(anyhow::Error::from)
        .and_then(|outcome| outcome.map_err(anyhow::Error::from));
    reloaded_view(&calendar, result)
}

async fn refresh(State(state): State<SharedState>) -> Response {
    let calendar = shared_calendar(&state);
    let reload = tokio::spawn({
        let calendar = Arc::clone(&calendar);
        async move { calendar.refresh().await }
    });
    let result = reload
        .await
        .map_err(anyhow::Error::from)
        .and_then(|outcome| outcome.map_err(anyhow::Error::from));
    reloaded_view(&calendar, result)
}

async fn select(
    State(state): State<SharedState>,
    Json(payload): Json<public::SelectRequest>,
) -> Response {
    let calendar = shared_calendar(&state);

    match (payload.appointment_id, payload.date) {
        // An appointment click never doubles as a day click
        (Some(id), _) => match calendar.select_appointment(id) {
            Some(event) => Json(event).into_response(),
            None => client_error(StatusCode::NOT_FOUND, "Appointment not found"),
        },
        (None, Some(date)) => Json(calendar.select_date(date)).into_response(),
        (None, None) => client_error(
            StatusCode::BAD_REQUEST,
            "Either date or appointment_id is required",
        ),
    }
}

async fn appointments(State(state): State<SharedState>) -> Json<Vec<MergedAppointment>> {
    let calendar = shared_calendar(&state);
    Json(calendar.working_set().as_ref().clone())
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", axum::routing::get(get_calendar))
        .route("/appointments", axum::routing::get(appointments))
        .route("/navigate", axum::routing::post(navigate))
        .route("/refresh", axum::routing::post(refresh))
        .route("/select", axum::routing::post(select))
}
