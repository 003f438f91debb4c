//! Wire-level request and response bodies.

use serde::{Deserialize, Serialize};

use crate::types::{Category, Status};
use crate::validation::{
    check_text, check_youtube_token, Validate, ValidationErrors, COURSE_NAME_MAX,
    COURSE_NAME_MIN, LESSON_NAME_MAX, LESSON_NAME_MIN,
};

/// Flat course representation used by listings and single-course reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDto {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub status: Status,
}

/// Course paired with its lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseWithLessonsDto {
    pub course: CourseDto,
    pub lessons: Vec<LessonDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "youtubeUrl")]
    pub youtube_url: String,
}

/// Body accepted by `POST /api/courses` and `PUT /api/courses/{id}`.
///
/// Text fields default to empty so a missing field surfaces as a field error
/// instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CourseRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub lessons: Vec<LessonRequest>,
}

/// Body accepted by the lesson write endpoints and nested in [`CourseRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LessonRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "youtubeUrl", default)]
    pub youtube_url: String,
}

pub(crate) const CATEGORY_REQUIRED: &str = "Category is required";

impl Validate for CourseRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_text(
            &mut errors,
            "name",
            &self.name,
            "Name",
            COURSE_NAME_MIN,
            COURSE_NAME_MAX,
        );
        if self.category.is_none() {
            errors.push("category", CATEGORY_REQUIRED);
        }
        for (index, lesson) in self.lessons.iter().enumerate() {
            lesson.collect_errors(&mut errors, &format!("lessons[{index}]."));
        }
        errors.into_result()
    }
}

impl LessonRequest {
    fn collect_errors(&self, errors: &mut ValidationErrors, prefix: &str) {
        check_text(
            errors,
            &format!("{prefix}name"),
            &self.name,
            "Name",
            LESSON_NAME_MIN,
            LESSON_NAME_MAX,
        );
        check_youtube_token(errors, &format!("{prefix}youtubeUrl"), &self.youtube_url);
    }
}

impl Validate for LessonRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.collect_errors(&mut errors, "");
        errors.into_result()
    }
}
