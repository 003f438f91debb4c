use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::error;

use course_catalog_core::Page;
use course_catalog_storage::Database;

use crate::error::{render_error_body, ApiError};
use crate::service::{CourseService, LessonService};
use crate::{course_api, lesson_api, telemetry};

/// Collaborators shared by every handler, assembled once at startup.
#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    storage: Database,
    courses: CourseService,
    lessons: LessonService,
    clock: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, storage: Database) -> Self {
        let courses = CourseService::new(storage.courses());
        let lessons = LessonService::new(storage.lessons(), storage.courses());
        Self {
            metrics,
            storage,
            courses,
            lessons,
            clock: Arc::new(Utc::now),
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn storage(&self) -> &Database {
        &self.storage
    }

    pub fn courses(&self) -> &CourseService {
        &self.courses
    }

    pub fn lessons(&self) -> &LessonService {
        &self.lessons
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .nest("/api/courses", course_api::routes())
        .nest("/api/lessons", lesson_api::routes())
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            render_error_body,
        ))
        .with_state(state)
}

/// Answers 204 for an empty page and 200 with the page otherwise.
pub(crate) fn page_or_no_content<T: Serialize>(page: Page<T>) -> Response {
    if page.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(page).into_response()
    }
}

/// Answers 201 with a `Location` header pointing at the new resource.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

async fn healthz(State(state): State<AppState>) -> StatusCode {
    match state.storage().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            error!(stage = "app", error = %err, "health check failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {method} {}", uri.path()))
}
