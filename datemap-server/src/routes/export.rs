//! Month export endpoint

use axum::{
    Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use datemap_core::MonthView;
use datemap_core::export::{ExportFormat, month_records};
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/export/{year}/{month}", get(export_month))
}

#[derive(Deserialize)]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
}

/// GET /export/:year/:month?format=json|csv - Month events as a download
async fn export_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let view = MonthView::new(year, month)?;
    let records = month_records(&state.store().flatten(), view.year(), view.month());
    let body = params.format.render(&records)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        params.format.file_name(view.year(), view.month())
    );

    Ok((
        [
            (header::CONTENT_TYPE, params.format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use datemap_core::EventDraft;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::routes::router;
    use crate::state::{AppState, test_state};

    fn seeded() -> AppState {
        let state = test_state();
        let date: datemap_core::DateKey = "2024-12-24".parse().unwrap();
        let day = date.date();
        state
            .store()
            .create(
                date,
                EventDraft::new(
                    "Dinner",
                    day.and_hms_opt(19, 0, 0).unwrap(),
                    day.and_hms_opt(21, 0, 0).unwrap(),
                )
                .with_description("bring wine, cheese"),
            )
            .unwrap();
        state
    }

    #[tokio::test]
    async fn csv_download_has_file_name_and_quoted_rows() {
        let response = router(seeded())
            .oneshot(
                Request::get("/export/2024/12?format=csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"12-2024-events.csv\""
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(
            csv,
            "Date,Name,Start Time,End Time,Description\n\
             2024-12-24,Dinner,2024-12-24T19:00:00,2024-12-24T21:00:00,\"bring wine, cheese\""
        );
    }

    #[tokio::test]
    async fn format_is_case_insensitive() {
        let response = router(seeded())
            .oneshot(
                Request::get("/export/2024/12?format=CSV")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv;charset=utf-8"
        );
    }

    #[tokio::test]
    async fn unknown_format_is_a_bad_request() {
        let response = router(seeded())
            .oneshot(
                Request::get("/export/2024/12?format=xml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn json_is_the_default_and_empty_months_are_empty_arrays() {
        let response = router(seeded())
            .oneshot(Request::get("/export/2024/11").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"[]");
    }
}
