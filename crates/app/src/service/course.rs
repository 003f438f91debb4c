use metrics::counter;
use tracing::{debug, info};

use course_catalog_core::{ids_consistent, Course, CourseDraft, CourseSort, Page, PageRequest, Status};
use course_catalog_storage::CourseRepository;

use super::ServiceError;

/// Course aggregate rules: active-only visibility, soft and hard deletion,
/// and full replacement of the lesson set on update.
#[derive(Clone)]
pub struct CourseService {
    courses: CourseRepository,
}

impl CourseService {
    pub fn new(courses: CourseRepository) -> Self {
        Self { courses }
    }

    pub async fn list_active(
        &self,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, ServiceError> {
        Ok(self.courses.find_by_status(Status::Active, request).await?)
    }

    pub async fn list_active_with_lessons(
        &self,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, ServiceError> {
        Ok(self
            .courses
            .find_by_status_with_lessons(Status::Active, request)
            .await?)
    }

    pub async fn list_all(
        &self,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, ServiceError> {
        Ok(self.courses.find_all(request).await?)
    }

    pub async fn list_all_with_lessons(
        &self,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, ServiceError> {
        Ok(self.courses.find_all_with_lessons(request).await?)
    }

    pub async fn find_active_by_id(&self, id: i64) -> Result<Course, ServiceError> {
        self.courses
            .find_by_id_and_status(id, Status::Active)
            .await?
            .ok_or(ServiceError::course_not_found(id))
    }

    pub async fn find_active_by_id_with_lessons(&self, id: i64) -> Result<Course, ServiceError> {
        self.courses
            .find_by_id_and_status_with_lessons(id, Status::Active)
            .await?
            .ok_or(ServiceError::course_not_found(id))
    }

    /// Persists a new course and any nested lessons, each bound to it.
    pub async fn create(&self, draft: CourseDraft) -> Result<Course, ServiceError> {
        let course = self.courses.insert(&draft).await?;
        counter!("catalog_courses_written_total", "op" => "create").increment(1);
        info!(
            stage = "service",
            course_id = course.id,
            lessons = course.lessons.len(),
            "course created"
        );
        Ok(course)
    }

    /// Overwrites name and category, and the status when one is given, then
    /// replaces the lesson collection with `draft.lessons`.
    pub async fn update(&self, id: i64, draft: CourseDraft) -> Result<Course, ServiceError> {
        if !self.validate_id_consistency(id, &draft) {
            return Err(ServiceError::IdMismatch { path_id: id });
        }

        let course = self
            .courses
            .replace(id, &draft)
            .await?
            .ok_or(ServiceError::course_not_found(id))?;
        counter!("catalog_courses_written_total", "op" => "update").increment(1);
        info!(
            stage = "service",
            course_id = id,
            lessons = course.lessons.len(),
            "course replaced"
        );
        Ok(course)
    }

    /// Retires a course by marking it inactive. The row and its lessons stay.
    pub async fn soft_delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.courses.update_status(id, Status::Inactive).await? {
            return Err(ServiceError::course_not_found(id));
        }
        counter!("catalog_courses_written_total", "op" => "soft_delete").increment(1);
        info!(stage = "service", course_id = id, "course deactivated");
        Ok(())
    }

    /// Removes a course permanently together with its lessons.
    pub async fn hard_delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.courses.delete(id).await? {
            return Err(ServiceError::course_not_found(id));
        }
        counter!("catalog_courses_written_total", "op" => "hard_delete").increment(1);
        info!(stage = "service", course_id = id, "course deleted");
        Ok(())
    }

    pub fn validate_id_consistency(&self, path_id: i64, draft: &CourseDraft) -> bool {
        let consistent = ids_consistent(path_id, draft.id);
        if !consistent {
            debug!(stage = "service", path_id, body_id = ?draft.id, "course id mismatch");
        }
        consistent
    }
}
