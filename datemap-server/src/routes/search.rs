//! Fuzzy search endpoint

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use datemap_core::search::{group_by_date, search};
use datemap_core::{DateKey, Event};
use serde::Deserialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search_events))
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /search?q= - Matching events grouped by day
async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<BTreeMap<DateKey, Vec<Event>>> {
    let records = state.store().flatten();
    let found = search(&records, &params.q, state.matcher());
    Json(group_by_date(found))
}
