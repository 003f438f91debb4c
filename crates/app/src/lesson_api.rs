use axum::{extract::State, http::StatusCode, response::Response, routing::get, Json, Router};

use course_catalog_core::{LessonDraft, LessonDto, LessonRequest, LessonSort, Validate};

use crate::error::ApiError;
use crate::extract::{JsonBody, Paging, PathId};
use crate::router::{created, page_or_no_content, AppState};

/// Routes mounted under `/api/lessons`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/course/:courseId", get(list_by_course).post(create))
        .route("/:id", get(find).put(update).delete(remove))
}

async fn list_all(
    State(state): State<AppState>,
    Paging(request): Paging<LessonSort>,
) -> Result<Response, ApiError> {
    let page = state.lessons().list_all(&request).await?;
    Ok(page_or_no_content(page.map(LessonDto::from)))
}

async fn list_by_course(
    State(state): State<AppState>,
    PathId(course_id): PathId,
    Paging(request): Paging<LessonSort>,
) -> Result<Response, ApiError> {
    let page = state.lessons().list_by_course(course_id, &request).await?;
    Ok(page_or_no_content(page.map(LessonDto::from)))
}

async fn find(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<LessonDto>, ApiError> {
    let lesson = state.lessons().find_by_id(id).await?;
    Ok(Json(lesson.into()))
}

async fn create(
    State(state): State<AppState>,
    PathId(course_id): PathId,
    JsonBody(request): JsonBody<LessonRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;
    let lesson = state
        .lessons()
        .create(course_id, LessonDraft::from(request))
        .await?;
    let location = format!("/api/lessons/{}", lesson.id);
    Ok(created(location, LessonDto::from(lesson)))
}

async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(request): JsonBody<LessonRequest>,
) -> Result<Json<LessonDto>, ApiError> {
    request.validate()?;
    let lesson = state.lessons().update(id, LessonDraft::from(request)).await?;
    Ok(Json(lesson.into()))
}

async fn remove(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    state.lessons().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
