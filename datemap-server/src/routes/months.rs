//! Month grid endpoint

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::Local;
use datemap_core::{DateKey, MonthView};
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/months/{year}/{month}", get(month_grid))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthResponse {
    pub year: i32,
    pub month: u32,
    pub title: String,
    /// `null` for the blanks before the 1st.
    pub cells: Vec<Option<DayCell>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub day: u32,
    pub date: DateKey,
    pub event_count: usize,
    pub is_weekend: bool,
    pub is_today: bool,
}

/// GET /months/:year/:month - Sunday-first grid with event counts
async fn month_grid(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthResponse>, AppError> {
    let view = MonthView::new(year, month)?;
    let counts = view.event_counts(&state.store().list_all());
    let today = Local::now().date_naive();

    let cells = view
        .cells()
        .into_iter()
        .map(|cell| {
            let day = cell?;
            Some(DayCell {
                day,
                date: view.date_key(day)?,
                event_count: counts.get(&day).copied().unwrap_or(0),
                is_weekend: view.is_weekend(day),
                is_today: view.is_today(day, today),
            })
        })
        .collect();

    Ok(Json(MonthResponse {
        year: view.year(),
        month: view.month(),
        title: view.title(),
        cells,
    }))
}
