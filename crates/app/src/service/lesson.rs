use metrics::counter;
use tracing::info;

use course_catalog_core::{ids_consistent, Lesson, LessonDraft, LessonSort, Page, PageRequest};
use course_catalog_storage::{CourseRepository, LessonRepository, StorageError};

use super::ServiceError;

#[derive(Clone)]
pub struct LessonService {
    lessons: LessonRepository,
    courses: CourseRepository,
}

impl LessonService {
    pub fn new(lessons: LessonRepository, courses: CourseRepository) -> Self {
        Self { lessons, courses }
    }

    pub async fn list_all(
        &self,
        request: &PageRequest<LessonSort>,
    ) -> Result<Page<Lesson>, ServiceError> {
        Ok(self.lessons.find_all(request).await?)
    }

    pub async fn list_by_course(
        &self,
        course_id: i64,
        request: &PageRequest<LessonSort>,
    ) -> Result<Page<Lesson>, ServiceError> {
        Ok(self.lessons.find_by_course(course_id, request).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Lesson, ServiceError> {
        self.lessons
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::lesson_not_found(id))
    }

    /// Adds a lesson to an existing course, active or not.
    pub async fn create(&self, course_id: i64, draft: LessonDraft) -> Result<Lesson, ServiceError> {
        if self.courses.find_by_id(course_id).await?.is_none() {
            return Err(ServiceError::course_not_found(course_id));
        }

        let lesson = self
            .lessons
            .insert(course_id, &draft)
            .await
            .map_err(|err| match err {
                StorageError::MissingCourse(id) => ServiceError::course_not_found(id),
                other => ServiceError::Storage(other),
            })?;
        counter!("catalog_lessons_written_total", "op" => "create").increment(1);
        info!(stage = "service", course_id, lesson_id = lesson.id, "lesson created");
        Ok(lesson)
    }

    /// Overwrites name and video token of an existing lesson.
    pub async fn update(&self, id: i64, draft: LessonDraft) -> Result<Lesson, ServiceError> {
        if !self.validate_id_consistency(id, &draft) {
            return Err(ServiceError::IdMismatch { path_id: id });
        }

        let lesson = self
            .lessons
            .update(id, &draft)
            .await?
            .ok_or(ServiceError::lesson_not_found(id))?;
        counter!("catalog_lessons_written_total", "op" => "update").increment(1);
        info!(stage = "service", lesson_id = id, "lesson updated");
        Ok(lesson)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.lessons.delete(id).await? {
            return Err(ServiceError::lesson_not_found(id));
        }
        counter!("catalog_lessons_written_total", "op" => "delete").increment(1);
        info!(stage = "service", lesson_id = id, "lesson deleted");
        Ok(())
    }

    pub fn validate_id_consistency(&self, path_id: i64, draft: &LessonDraft) -> bool {
        ids_consistent(path_id, draft.id)
    }
}
