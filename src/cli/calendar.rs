use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::calendar::{CalendarDay, CalendarViewModel, PREVIEW_LIMIT, day_preview};
use crate::core::AppConfig;
use crate::supabase::SupabaseClient;

const CELL_WIDTH: usize = 14;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn cell(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH - 1).collect();
    format!("{:<width$}", clipped, width = CELL_WIDTH)
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let row: String = cells.collect();
    out.push_str(row.trim_end());
    out.push('\n');
}

/// Plain-text month grid. Today is marked with `*`, the selected day
/// with `>`, and days outside the month are wrapped in parentheses.
pub fn render_month(month: NaiveDate, days: &[CalendarDay], tz: Tz) -> String {
    let mut out = format!("{}\n", month.format("%B %Y"));
    push_row(&mut out, WEEKDAYS.iter().map(|d| cell(d)));

    for week in days.chunks(7) {
        let previews: Vec<_> = week.iter().map(|day| day_preview(day, tz)).collect();

        push_row(
            &mut out,
            week.iter().map(|day| {
                let marker = if day.is_selected {
                    ">"
                } else if day.is_today {
                    "*"
                } else {
                    ""
                };
                if day.is_current_month {
                    cell(&format!("{}{}", marker, day.date.day()))
                } else {
                    cell(&format!("{}({})", marker, day.date.day()))
                }
            }),
        );

        for line in 0..PREVIEW_LIMIT {
            push_row(
                &mut out,
                previews.iter().map(|preview| match preview.entries.get(line) {
                    Some(entry) => match &entry.candidate_name {
                        Some(name) => cell(&format!("{} {}", entry.label, name)),
                        None => cell(&entry.label),
                    },
                    None => cell(""),
                }),
            );
        }

        push_row(
            &mut out,
            previews.iter().map(|preview| {
                if preview.remaining > 0 {
                    cell(&format!("+{} more", preview.remaining))
                } else {
                    cell("")
                }
            }),
        );
    }

    out
}

fn parse_month_arg(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month '{}', expected YYYY-MM", value))
}

/// The day to highlight, today unless one is given
fn parse_selected_arg(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match value {
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid selected date: {}", e)),
        None => Ok(today),
    }
}

pub async fn run(month: Option<String>, selected: Option<String>, config: AppConfig) -> Result<()> {
    if !config.is_configured() {
        bail!("Supabase environment variables not configured");
    }

    let supabase = Arc::new(SupabaseClient::from_config(&config));
    let today = chrono::Utc::now().with_timezone(&config.timezone).date_naive();
    let selected = parse_selected_arg(selected.as_deref(), today)?;

    let calendar = CalendarViewModel::new(
        supabase.clone(),
        supabase,
        config.timezone,
        today,
        Some(selected),
    );
    let month = match month {
        Some(value) => parse_month_arg(&value)?,
        None => calendar.month(),
    };
    calendar.show_month(month).await?;

    let days = calendar.grid(calendar.today());
    print!("{}", render_month(month, &days, config.timezone));
    Ok(())
}
