//! Domain model for the course catalog: entities, wire DTOs, validation and paging.

pub mod dto;
pub mod mapper;
pub mod pagination;
pub mod types;
pub mod validation;

pub use dto::{CourseDto, CourseRequest, CourseWithLessonsDto, LessonDto, LessonRequest};
pub use pagination::{
    CourseSort, LessonSort, Page, PageMetadata, PageRequest, PageRequestError, SortDirection,
    SortKey,
};
pub use types::{
    ids_consistent, Category, Course, CourseDraft, Lesson, LessonDraft, Status, UnknownLabel,
};
pub use validation::{FieldError, Validate, ValidationErrors};
