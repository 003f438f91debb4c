use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use course_catalog_core::{Category, CourseDraft, LessonDraft, Status};
use course_catalog_storage::Database;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::router::{app_router, AppState};
use crate::telemetry;

pub(crate) async fn setup_db() -> (Database, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
    let database = Database::connect(&url).await.expect("connect");
    database.run_migrations().await.expect("migrations");
    (database, dir)
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub(crate) async fn setup_state() -> (AppState, TempDir) {
    let metrics = telemetry::init_metrics().expect("metrics init");
    let (database, dir) = setup_db().await;
    let state = AppState::new(metrics, database).with_clock(Arc::new(fixed_now));
    (state, dir)
}

pub(crate) fn lesson(name: &str, token: &str) -> LessonDraft {
    LessonDraft {
        id: None,
        name: name.to_string(),
        youtube_url: token.to_string(),
    }
}

pub(crate) fn draft(name: &str, category: Category, lessons: Vec<LessonDraft>) -> CourseDraft {
    CourseDraft {
        id: None,
        name: name.to_string(),
        category,
        status: None,
        lessons,
    }
}

pub(crate) fn inactive(mut draft: CourseDraft) -> CourseDraft {
    draft.status = Some(Status::Inactive);
    draft
}

pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Sends one request through a fresh router built from `state`.
pub(crate) async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> TestResponse {
    let app: Router = app_router(state.clone());
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.expect("handler should respond");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should read")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
