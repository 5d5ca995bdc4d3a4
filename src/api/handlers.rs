//! Route handlers for the status endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;

use super::AppState;
use crate::core::status;
use crate::errors::{Error, Result};
use crate::models::{StatusSubmission, StatusView};

/// Query string of `GET /v1/status`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusFilter {
    #[serde(rename = "dateFrom")]
    date_from: Option<String>,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 - Not Found")
}

/// POST /v1/status
pub(crate) async fn handle_submit_status(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<StatusSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<String>)> {
    let Json(submission) = payload.map_err(|rejection| Error::InvalidBody {
        message: rejection.body_text(),
    })?;

    let id = status::submit(&state.database, &state.layout, &submission).await?;
    Ok((StatusCode::CREATED, Json(id.to_string())))
}

/// GET /v1/status
pub(crate) async fn handle_list_status(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<Vec<StatusView>>> {
    let records =
        status::query_all(&state.database, &state.layout, filter.date_from.as_deref()).await?;
    Ok(Json(records))
}

/// GET /v1/status/current
pub(crate) async fn handle_current_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StatusView>>> {
    let latest = status::query_latest(&state.database, &state.layout).await?;
    Ok(Json(latest))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::{AppState, router};
    use crate::core::DateLayout;
    use crate::errors::Result;
    use crate::models::StatusView;
    use crate::test_utils::{init_test_tracing, setup_test_state};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_example_scenario_over_http() -> Result<()> {
        init_test_tracing();
        let app = router(setup_test_state().await?);

        let (status, body) = send(&app, post_json("/v1/status", r#"{"status":100}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let n: String = serde_json::from_str(&body).unwrap();
        let n: i64 = n.parse().unwrap();

        let (status, body) = send(
            &app,
            post_json(
                "/v1/status",
                r#"{"status":300,"changeDate":"2024-01-01T00:00:00Z"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let m: String = serde_json::from_str(&body).unwrap();
        let m: i64 = m.parse().unwrap();
        assert_ne!(n, m);

        let (status, body) = send(&app, get("/v1/status?dateFrom=2023-01-01T00:00:00Z")).await;
        assert_eq!(status, StatusCode::OK);
        let all: Vec<StatusView> = serde_json::from_str(&body).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!((all[0].id, all[0].status), (n, 100));
        assert_eq!(
            all[1],
            StatusView {
                id: m,
                status: 300,
                change_date: "2024-01-01T00:00:00Z".to_string(),
            }
        );

        let (status, body) = send(&app, get("/v1/status/current")).await;
        assert_eq!(status, StatusCode::OK);
        let latest: Vec<StatusView> = serde_json::from_str(&body).unwrap();
        assert_eq!(latest, vec![all[0].clone()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_response_uses_camel_case_fields() -> Result<()> {
        let app = router(setup_test_state().await?);
        send(
            &app,
            post_json(
                "/v1/status",
                r#"{"status":200,"changeDate":"2024-04-01T10:00:00Z"}"#,
            ),
        )
        .await;

        let (_, body) = send(&app, get("/v1/status")).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value[0]["changeDate"], "2024-04-01T10:00:00Z");
        assert_eq!(value[0]["status"], 200);
        assert!(value[0]["id"].is_i64());
        Ok(())
    }

    #[tokio::test]
    async fn test_status_code_beyond_i32_is_accepted() -> Result<()> {
        let app = router(setup_test_state().await?);

        let (status, _) = send(&app, post_json("/v1/status", r#"{"status":3000000000}"#)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, get("/v1/status/current")).await;
        assert_eq!(status, StatusCode::OK);
        let latest: Vec<StatusView> = serde_json::from_str(&body).unwrap();
        assert_eq!(latest[0].status, 3_000_000_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_date_from_is_bad_request() -> Result<()> {
        let app = router(setup_test_state().await?);

        let (status, body) = send(&app, get("/v1/status?dateFrom=not-a-date")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.ends_with("- Correct format is RFC3339"), "body: {body}");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_change_date_is_bad_request() -> Result<()> {
        let app = router(setup_test_state().await?);

        let (status, body) = send(
            &app,
            post_json("/v1/status", r#"{"status":100,"changeDate":"last tuesday"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Correct format is"), "body: {body}");

        let (_, body) = send(&app, get("/v1/status")).await;
        assert_eq!(body, "[]");
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_body_is_bad_request() -> Result<()> {
        let app = router(setup_test_state().await?);

        let (status, _) = send(&app, post_json("/v1/status", r#"{"status":"ok"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_far_future_filter_is_empty_list() -> Result<()> {
        let app = router(setup_test_state().await?);
        send(&app, post_json("/v1/status", r#"{"status":100}"#)).await;

        let (status, body) = send(&app, get("/v1/status?dateFrom=9999-12-31T00:00:00Z")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
        Ok(())
    }

    #[tokio::test]
    async fn test_current_on_empty_store_is_not_found() -> Result<()> {
        let app = router(setup_test_state().await?);

        let (status, body) = send(&app, get("/v1/status/current")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "No status has been recorded yet");
        Ok(())
    }

    #[tokio::test]
    async fn test_over_quota_is_service_unavailable() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "database or disk is full".to_string(),
            ))])
            .into_connection();
        let app = router(Arc::new(AppState::new(db, DateLayout::default())));

        let (status, body) = send(&app, get("/v1/status")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "503 - Over Quota");
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "disk I/O error".to_string(),
            ))])
            .into_connection();
        let app = router(Arc::new(AppState::new(db, DateLayout::default())));

        let (status, body) = send(&app, get("/v1/status/current")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("disk I/O error"), "body: {body}");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() -> Result<()> {
        let app = router(setup_test_state().await?);

        let (status, _) = send(&app, get("/v2/nothing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}
