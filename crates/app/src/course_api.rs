use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{delete, get},
    Json, Router,
};

use course_catalog_core::{CourseDraft, CourseDto, CourseRequest, CourseSort, CourseWithLessonsDto};

use crate::error::ApiError;
use crate::extract::{JsonBody, Paging, PathId};
use crate::router::{created, page_or_no_content, AppState};

/// Routes mounted under `/api/courses`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active).post(create))
        .route("/all", get(list_all))
        .route("/all/with-lessons", get(list_all_with_lessons))
        .route("/with-lessons", get(list_active_with_lessons))
        .route(
            "/:id",
            get(find_active).put(update).delete(soft_delete),
        )
        .route("/:id/with-lessons", get(find_active_with_lessons))
        .route("/:id/hard", delete(hard_delete))
}

async fn list_active(
    State(state): State<AppState>,
    Paging(request): Paging<CourseSort>,
) -> Result<Response, ApiError> {
    let page = state.courses().list_active(&request).await?;
    Ok(page_or_no_content(page.map(CourseDto::from)))
}

async fn list_all(
    State(state): State<AppState>,
    Paging(request): Paging<CourseSort>,
) -> Result<Response, ApiError> {
    let page = state.courses().list_all(&request).await?;
    Ok(page_or_no_content(page.map(CourseDto::from)))
}

async fn list_all_with_lessons(
    State(state): State<AppState>,
    Paging(request): Paging<CourseSort>,
) -> Result<Response, ApiError> {
    let page = state.courses().list_all_with_lessons(&request).await?;
    Ok(page_or_no_content(page.map(CourseWithLessonsDto::from)))
}

async fn list_active_with_lessons(
    State(state): State<AppState>,
    Paging(request): Paging<CourseSort>,
) -> Result<Response, ApiError> {
    let page = state.courses().list_active_with_lessons(&request).await?;
    Ok(page_or_no_content(page.map(CourseWithLessonsDto::from)))
}

async fn find_active(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<CourseDto>, ApiError> {
    let course = state.courses().find_active_by_id(id).await?;
    Ok(Json(course.into()))
}

async fn find_active_with_lessons(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<CourseWithLessonsDto>, ApiError> {
    let course = state.courses().find_active_by_id_with_lessons(id).await?;
    Ok(Json(course.into()))
}

async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CourseRequest>,
) -> Result<Response, ApiError> {
    let draft = CourseDraft::try_from(request)?;
    let course = state.courses().create(draft).await?;
    let location = format!("/api/courses/{}", course.id);
    Ok(created(location, CourseWithLessonsDto::from(course)))
}

async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(request): JsonBody<CourseRequest>,
) -> Result<Json<CourseWithLessonsDto>, ApiError> {
    let draft = CourseDraft::try_from(request)?;
    let course = state.courses().update(id, draft).await?;
    Ok(Json(course.into()))
}

async fn soft_delete(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    state.courses().soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn hard_delete(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<StatusCode, ApiError> {
    state.courses().hard_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, Method, StatusCode};
    use course_catalog_core::Category;
    use serde_json::json;

    use crate::test_support::{draft, inactive, lesson, send, setup_state};

    #[tokio::test]
    async fn create_returns_location_and_defaults_to_active() {
        let (state, _dir) = setup_state().await;

        let response = send(
            &state,
            Method::POST,
            "/api/courses",
            Some(json!({"name": "Angular Básico", "category": "Front-end"})),
        )
        .await;

        assert_eq!(response.status, StatusCode::CREATED);
        let id = response.body["course"]["_id"].as_i64().expect("id assigned");
        assert_eq!(
            response.headers[header::LOCATION],
            format!("/api/courses/{id}").as_str()
        );
        assert_eq!(response.body["course"]["name"], "Angular Básico");
        assert_eq!(response.body["course"]["category"], "Front-end");
        assert_eq!(response.body["course"]["status"], "Active");
        assert_eq!(response.body["lessons"], json!([]));
    }

    #[tokio::test]
    async fn create_ignores_client_ids_and_persists_lessons() {
        let (state, _dir) = setup_state().await;

        let response = send(
            &state,
            Method::POST,
            "/api/courses",
            Some(json!({
                "_id": 500,
                "name": "Java Spring Boot",
                "category": "Back-end",
                "lessons": [
                    {"id": 900, "name": "Configuração do Spring Boot", "youtubeUrl": "rRKAktbMNt4"},
                    {"name": "REST APIs com Spring", "youtubeUrl": "6NaBfBMnp7Q"}
                ]
            })),
        )
        .await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_ne!(response.body["course"]["_id"], 500);
        let lessons = response.body["lessons"].as_array().expect("lessons");
        assert_eq!(lessons.len(), 2);
        assert_ne!(lessons[0]["id"], 900);
        assert_eq!(lessons[1]["youtubeUrl"], "6NaBfBMnp7Q");
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload_with_field_messages() {
        let (state, _dir) = setup_state().await;

        let response = send(
            &state,
            Method::POST,
            "/api/courses",
            Some(json!({"name": "Java", "lessons": [{"name": "XY", "youtubeUrl": ""}]})),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["status"], 400);
        assert_eq!(response.body["error"], "Validation Error");
        assert_eq!(
            response.body["message"],
            "name: Name must be between 5 and 100 characters, \
             category: Category is required, \
             lessons[0].name: Name must be between 3 and 100 characters, \
             lessons[0].youtubeUrl: YouTube URL is required"
        );
        assert_eq!(response.body["path"], "/api/courses");
        assert_eq!(
            state.storage().courses().count().await.expect("count"),
            0,
            "nothing is persisted when validation fails"
        );
    }

    #[tokio::test]
    async fn unknown_category_label_is_a_validation_error() {
        let (state, _dir) = setup_state().await;
        let response = send(
            &state,
            Method::POST,
            "/api/courses",
            Some(json!({"name": "Culinária Básica", "category": "Cooking"})),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Validation Error");
    }

    #[tokio::test]
    async fn list_returns_page_and_no_content_when_empty() {
        let (state, _dir) = setup_state().await;

        let empty = send(&state, Method::GET, "/api/courses", None).await;
        assert_eq!(empty.status, StatusCode::NO_CONTENT);

        for name in ["React Avançado", "Angular Básico"] {
            state
                .courses()
                .create(draft(name, Category::Frontend, vec![]))
                .await
                .expect("create");
        }

        let response = send(&state, Method::GET, "/api/courses?size=1", None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["content"][0]["name"], "Angular Básico");
        assert_eq!(response.body["page"]["totalElements"], 2);
        assert_eq!(response.body["page"]["totalPages"], 2);
        assert_eq!(response.body["page"]["size"], 1);

        let desc = send(
            &state,
            Method::GET,
            "/api/courses?sortBy=name&direction=desc",
            None,
        )
        .await;
        assert_eq!(desc.body["content"][0]["name"], "React Avançado");
    }

    #[tokio::test]
    async fn invalid_direction_is_rejected() {
        let (state, _dir) = setup_state().await;
        let response = send(
            &state,
            Method::GET,
            "/api/courses?sortBy=name&direction=INVALID",
            None,
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body["message"],
            "direction: invalid value 'INVALID', expected 'ASC' or 'DESC'"
        );
    }

    #[tokio::test]
    async fn unknown_sort_property_is_rejected() {
        let (state, _dir) = setup_state().await;
        let response = send(&state, Method::GET, "/api/courses/all?sortBy=price", None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn soft_deleted_course_disappears_from_active_views_only() {
        let (state, _dir) = setup_state().await;
        let course = state
            .courses()
            .create(draft("Docker e Kubernetes", Category::DevOps, vec![]))
            .await
            .expect("create");
        let uri = format!("/api/courses/{}", course.id);

        let deleted = send(&state, Method::DELETE, &uri, None).await;
        assert_eq!(deleted.status, StatusCode::NO_CONTENT);

        let lookup = send(&state, Method::GET, &uri, None).await;
        assert_eq!(lookup.status, StatusCode::NOT_FOUND);
        assert_eq!(
            lookup.body["message"],
            format!("Course not found with id: {}", course.id)
        );
        assert_eq!(lookup.body["path"], uri);

        let all = send(&state, Method::GET, "/api/courses/all", None).await;
        assert_eq!(all.status, StatusCode::OK);
        assert_eq!(all.body["content"][0]["_id"], course.id);
        assert_eq!(all.body["content"][0]["status"], "Inactive");

        let active = send(&state, Method::GET, "/api/courses", None).await;
        assert_eq!(active.status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn hard_delete_removes_course_and_lessons() {
        let (state, _dir) = setup_state().await;
        let course = state
            .courses()
            .create(draft(
                "AWS Fundamentos",
                Category::Cloud,
                vec![lesson("EC2 Básico", "iHX-jtKghC0")],
            ))
            .await
            .expect("create");

        let uri = format!("/api/courses/{}/hard", course.id);
        assert_eq!(
            send(&state, Method::DELETE, &uri, None).await.status,
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            send(&state, Method::DELETE, &uri, None).await.status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            send(&state, Method::GET, "/api/lessons", None).await.status,
            StatusCode::NO_CONTENT
        );
    }

    #[tokio::test]
    async fn update_replaces_lessons() {
        let (state, _dir) = setup_state().await;
        let course = state
            .courses()
            .create(draft(
                "Java Spring Boot",
                Category::Backend,
                vec![
                    lesson("Configuração", "rRKAktbMNt4"),
                    lesson("REST APIs", "6NaBfBMnp7Q"),
                ],
            ))
            .await
            .expect("create");

        let response = send(
            &state,
            Method::PUT,
            &format!("/api/courses/{}", course.id),
            Some(json!({
                "name": "Java Spring Boot",
                "category": "Back-end",
                "lessons": [{"name": "XYZ", "youtubeUrl": "abc"}]
            })),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        let lessons = response.body["lessons"].as_array().expect("lessons");
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0]["name"], "XYZ");

        let with_lessons = send(
            &state,
            Method::GET,
            &format!("/api/courses/{}/with-lessons", course.id),
            None,
        )
        .await;
        assert_eq!(with_lessons.status, StatusCode::OK);
        assert_eq!(with_lessons.body["lessons"], response.body["lessons"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_last_write_wins() {
        let (state, _dir) = setup_state().await;
        let course = state
            .courses()
            .create(draft("Terraform e IaC", Category::DevOps, vec![]))
            .await
            .expect("create");
        let uri = format!("/api/courses/{}", course.id);

        let mut handles = Vec::new();
        for round in 0..16 {
            let state = state.clone();
            let uri = uri.clone();
            handles.push(tokio::spawn(async move {
                let body = json!({
                    "name": format!("Terraform round {round}"),
                    "category": "DevOps",
                    "lessons": [{"name": "Terraform Basics", "youtubeUrl": "l5k1ai_GBDE"}]
                });
                send(&state, Method::PUT, &uri, Some(body)).await.status
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.expect("task joined"), StatusCode::OK);
        }

        let stored = send(&state, Method::GET, &format!("{uri}/with-lessons"), None).await;
        assert_eq!(stored.status, StatusCode::OK);
        assert_eq!(stored.body["lessons"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn update_with_mismatched_body_id_is_rejected() {
        let (state, _dir) = setup_state().await;
        let course = state
            .courses()
            .create(draft("React Native", Category::Mobile, vec![]))
            .await
            .expect("create");

        let response = send(
            &state,
            Method::PUT,
            &format!("/api/courses/{}", course.id),
            Some(json!({"_id": course.id + 6, "name": "Renamed Course", "category": "Mobile"})),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Bad Request");
        let stored = state
            .courses()
            .find_active_by_id(course.id)
            .await
            .expect("find");
        assert_eq!(stored.name, "React Native");
    }

    #[tokio::test]
    async fn update_of_missing_course_is_not_found() {
        let (state, _dir) = setup_state().await;
        let response = send(
            &state,
            Method::PUT,
            "/api/courses/77",
            Some(json!({"name": "Ghost Course", "category": "Cloud"})),
        )
        .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_positive_and_text_ids_are_rejected() {
        let (state, _dir) = setup_state().await;
        for uri in ["/api/courses/0", "/api/courses/-4", "/api/courses/abc/with-lessons"] {
            let response = send(&state, Method::GET, uri, None).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(response.body["error"], "Validation Error");
        }
    }

    #[tokio::test]
    async fn with_lessons_listing_hides_inactive_courses() {
        let (state, _dir) = setup_state().await;
        state
            .courses()
            .create(draft(
                "Machine Learning",
                Category::DataScience,
                vec![lesson("Redes Neurais", "IHZwWFHWa-w")],
            ))
            .await
            .expect("create");
        let retired = state
            .courses()
            .create(inactive(draft("GraphQL APIs", Category::Backend, vec![])))
            .await
            .expect("create");

        let response = send(&state, Method::GET, "/api/courses/with-lessons", None).await;
        assert_eq!(response.status, StatusCode::OK);
        let content = response.body["content"].as_array().expect("content");
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["course"]["name"], "Machine Learning");
        assert_eq!(content[0]["lessons"][0]["youtubeUrl"], "IHZwWFHWa-w");

        let everything = send(&state, Method::GET, "/api/courses/all/with-lessons", None).await;
        assert_eq!(everything.status, StatusCode::OK);
        assert_eq!(everything.body["page"]["totalElements"], 2);
        assert_eq!(everything.body["content"][0]["course"]["name"], "GraphQL APIs");
        assert_eq!(everything.body["content"][0]["course"]["status"], "Inactive");

        let hidden = send(
            &state,
            Method::GET,
            &format!("/api/courses/{}/with-lessons", retired.id),
            None,
        )
        .await;
        assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    }
}
