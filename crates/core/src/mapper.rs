//! Conversions between persisted entities, drafts and DTOs.
//!
//! Absence is carried by `Option`, so `None.map(CourseDto::from)` stays `None`.

use crate::dto::{
    CourseDto, CourseRequest, CourseWithLessonsDto, LessonDto, LessonRequest, CATEGORY_REQUIRED,
};
use crate::types::{Course, CourseDraft, Lesson, LessonDraft};
use crate::validation::{Validate, ValidationErrors};

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            category: course.category,
            status: course.status,
        }
    }
}

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            category: course.category,
            status: course.status,
        }
    }
}

impl From<Course> for CourseWithLessonsDto {
    fn from(mut course: Course) -> Self {
        let lessons = std::mem::take(&mut course.lessons)
            .into_iter()
            .map(LessonDto::from)
            .collect();
        Self {
            course: CourseDto::from(course),
            lessons,
        }
    }
}

impl From<Lesson> for LessonDto {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            name: lesson.name,
            youtube_url: lesson.youtube_url,
        }
    }
}

impl From<CourseDto> for CourseDraft {
    fn from(dto: CourseDto) -> Self {
        Self {
            id: Some(dto.id),
            name: dto.name,
            category: dto.category,
            status: Some(dto.status),
            lessons: Vec::new(),
        }
    }
}

impl From<LessonDto> for LessonDraft {
    fn from(dto: LessonDto) -> Self {
        Self {
            id: Some(dto.id),
            name: dto.name,
            youtube_url: dto.youtube_url,
        }
    }
}

impl From<LessonRequest> for LessonDraft {
    fn from(request: LessonRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            youtube_url: request.youtube_url,
        }
    }
}

/// Validates the request and turns it into a draft. Requests never carry a status.
impl TryFrom<CourseRequest> for CourseDraft {
    type Error = ValidationErrors;

    fn try_from(request: CourseRequest) -> Result<Self, Self::Error> {
        request.validate()?;
        let category = request
            .category
            .ok_or_else(|| ValidationErrors::single("category", CATEGORY_REQUIRED))?;
        Ok(Self {
            id: request.id,
            name: request.name,
            category,
            status: None,
            lessons: request.lessons.into_iter().map(LessonDraft::from).collect(),
        })
    }
}
