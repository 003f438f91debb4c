//! Business rules layered over the repositories.

mod course;
mod lesson;

use std::fmt;

use thiserror::Error;

use course_catalog_storage::StorageError;

pub use course::CourseService;
pub use lesson::LessonService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Course,
    Lesson,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course => f.write_str("Course"),
            Self::Lesson => f.write_str("Lesson"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: Entity, id: i64 },
    #[error("request body id does not match path id {path_id}")]
    IdMismatch { path_id: i64 },
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    fn course_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Course,
            id,
        }
    }

    fn lesson_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Lesson,
            id,
        }
    }
}
