//! Per-day event endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use datemap_core::{Event, EventForm, EventPatch, EventsByDate};
use tracing::info;

use crate::routes::{AppError, date_param};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_all))
        .route("/days/{date}/events", get(list_day).post(create_event))
        .route(
            "/days/{date}/events/{id}",
            patch(update_event).delete(delete_event),
        )
}

/// GET /events - Every day with its events
async fn list_all(State(state): State<AppState>) -> Json<EventsByDate> {
    Json(state.store().list_all())
}

/// GET /days/:date/events - Events of one day, in insertion order
async fn list_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Event>>, AppError> {
    let date = date_param(&date)?;
    Ok(Json(state.store().list_for_date(date)))
}

/// POST /days/:date/events - Create an event from form fields
async fn create_event(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(form): Json<EventForm>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let date = date_param(&date)?;
    let draft = form.into_draft(date)?;

    let event = state.store().create(date, draft)?;
    info!(%date, id = %event.id, "created event");

    Ok((StatusCode::CREATED, Json(event)))
}

/// PATCH /days/:date/events/:id - Change some fields of an event
async fn update_event(
    State(state): State<AppState>,
    Path((date, id)): Path<(String, String)>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, AppError> {
    let date = date_param(&date)?;

    let event = state.store().update(date, &id, &patch)?;
    info!(%date, %id, "updated event");

    Ok(Json(event))
}

/// DELETE /days/:date/events/:id - Remove an event; absent ids are not an error
async fn delete_event(
    State(state): State<AppState>,
    Path((date, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let date = date_param(&date)?;

    if state.store().delete(date, &id)? {
        info!(%date, %id, "deleted event");
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::routes::router;
    use crate::state::test_state;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn form(name: &str, start: &str, end: &str) -> Value {
        json!({ "name": name, "startTime": start, "endTime": end })
    }

    #[tokio::test]
    async fn create_returns_201_and_lists_the_event() {
        let app = router(test_state());

        let (status, event) = send(
            &app,
            "POST",
            "/days/2024-12-10/events",
            Some(form("Dentist", "09:00", "10:00")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["name"], "Dentist");
        assert_eq!(event["startTime"], "2024-12-10T09:00:00");

        let (status, day) = send(&app, "GET", "/days/2024-12-10/events", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(day.as_array().unwrap().len(), 1);

        let (_, all) = send(&app, "GET", "/events", None).await;
        assert_eq!(all["2024-12-10"][0]["id"], event["id"]);
    }

    #[tokio::test]
    async fn overlapping_create_returns_409() {
        let app = router(test_state());
        send(&app, "POST", "/days/2024-12-10/events", Some(form("A", "09:00", "10:00"))).await;

        let (status, body) = send(
            &app,
            "POST",
            "/days/2024-12-10/events",
            Some(form("B", "09:30", "10:30")),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "This event overlaps with an existing event.");

        let (_, day) = send(&app, "GET", "/days/2024-12-10/events", None).await;
        assert_eq!(day.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_returns_422() {
        let app = router(test_state());

        let (status, body) = send(
            &app,
            "POST",
            "/days/2024-12-10/events",
            Some(form("", "09:00", "10:00")),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Event name is required");

        let (status, _) = send(
            &app,
            "POST",
            "/days/2024-12-10/events",
            Some(form("Late", "11:00", "10:00")),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, "GET", "/days/not-a-date/events", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn patch_updates_in_place_and_404s_on_unknown_ids() {
        let app = router(test_state());
        let (_, event) = send(
            &app,
            "POST",
            "/days/2024-12-10/events",
            Some(form("Dentist", "09:00", "10:00")),
        )
        .await;
        let uri = format!("/days/2024-12-10/events/{}", event["id"].as_str().unwrap());

        let (status, updated) = send(
            &app,
            "PATCH",
            &uri,
            Some(json!({ "name": "Dentist (moved)", "endTime": "2024-12-10T11:00:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Dentist (moved)");
        assert_eq!(updated["endTime"], "2024-12-10T11:00:00");
        assert_eq!(updated["id"], event["id"]);

        let (status, body) = send(
            &app,
            "PATCH",
            "/days/2024-12-10/events/missing",
            Some(json!({ "name": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn delete_returns_204_even_when_absent() {
        let app = router(test_state());
        let (_, event) = send(
            &app,
            "POST",
            "/days/2024-12-10/events",
            Some(form("Dentist", "09:00", "10:00")),
        )
        .await;
        let uri = format!("/days/2024-12-10/events/{}", event["id"].as_str().unwrap());

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, all) = send(&app, "GET", "/events", None).await;
        assert_eq!(all, json!({}));
    }
}
