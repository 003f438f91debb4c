use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use course_catalog_core::{Course, CourseDraft, CourseSort, Lesson, Page, PageRequest, Status};

use crate::lesson::{insert_lessons, load_lessons_for};
use crate::{order_clause, to_count, StorageError};

const COURSE_COLUMNS: &str = "SELECT id, name, category, status FROM courses";

/// Repository for courses and the lessons they own.
#[derive(Clone)]
pub struct CourseRepository {
    pool: SqlitePool,
}

impl CourseRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists every course regardless of status. Lessons are not loaded.
    pub async fn find_all(
        &self,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, StorageError> {
        self.fetch_page(None, request, false).await
    }

    /// Lists courses with the given status. Lessons are not loaded.
    pub async fn find_by_status(
        &self,
        status: Status,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, StorageError> {
        self.fetch_page(Some(status), request, false).await
    }

    /// Lists every course with its lessons populated.
    pub async fn find_all_with_lessons(
        &self,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, StorageError> {
        self.fetch_page(None, request, true).await
    }

    /// Lists courses with the given status and their lessons.
    pub async fn find_by_status_with_lessons(
        &self,
        status: Status,
        request: &PageRequest<CourseSort>,
    ) -> Result<Page<Course>, StorageError> {
        self.fetch_page(Some(status), request, true).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Course>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch_course(&mut conn, id, None, false).await
    }

    pub async fn find_by_id_and_status(
        &self,
        id: i64,
        status: Status,
    ) -> Result<Option<Course>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch_course(&mut conn, id, Some(status), false).await
    }

    pub async fn find_by_id_with_lessons(&self, id: i64) -> Result<Option<Course>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch_course(&mut conn, id, None, true).await
    }

    pub async fn find_by_id_and_status_with_lessons(
        &self,
        id: i64,
        status: Status,
    ) -> Result<Option<Course>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch_course(&mut conn, id, Some(status), true).await
    }

    /// Inserts a course and its nested lessons in one transaction.
    ///
    /// `draft.id` is ignored; the store assigns identifiers.
    pub async fn insert(&self, draft: &CourseDraft) -> Result<Course, StorageError> {
        let status = draft.status.unwrap_or_default();
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO courses (name, category, status) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let lessons = insert_lessons(&mut tx, id, &draft.lessons).await?;
        tx.commit().await?;

        Ok(Course {
            id,
            name: draft.name.clone(),
            category: draft.category,
            status,
            lessons,
        })
    }

    /// Overwrites a course and replaces its whole lesson set atomically.
    ///
    /// The status is only changed when `draft.status` is set. Returns `None`
    /// when the course does not exist, leaving the database untouched.
    pub async fn replace(
        &self,
        id: i64,
        draft: &CourseDraft,
    ) -> Result<Option<Course>, StorageError> {
        let mut tx = self.pool.begin().await?;

        // Writing first takes the write lock before any read snapshot exists.
        let row: Option<CourseRow> = sqlx::query_as(
            "UPDATE courses SET name = ?, category = ?, status = COALESCE(?, status) \
             WHERE id = ? RETURNING id, name, category, status",
        )
        .bind(&draft.name)
        .bind(draft.category.as_str())
        .bind(draft.status.map(Status::as_str))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM lessons WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let lessons = insert_lessons(&mut tx, id, &draft.lessons).await?;
        let course = row.into_domain(lessons)?;
        tx.commit().await?;

        Ok(Some(course))
    }

    /// Sets the status of a course. Returns `false` when the id is unknown.
    pub async fn update_status(&self, id: i64, status: Status) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE courses SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes a course row; its lessons go with it through the foreign key cascade.
    pub async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<u64, StorageError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(total))
    }

    async fn fetch_page(
        &self,
        status: Option<Status>,
        request: &PageRequest<CourseSort>,
        with_lessons: bool,
    ) -> Result<Page<Course>, StorageError> {
        let mut conn = self.pool.acquire().await?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM courses");
        push_status_filter(&mut count, status);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;

        let mut query = QueryBuilder::<Sqlite>::new(COURSE_COLUMNS);
        push_status_filter(&mut query, status);
        query.push(order_clause(request));
        query
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());
        let rows: Vec<CourseRow> = query.build_query_as().fetch_all(&mut *conn).await?;

        let mut lessons = if with_lessons {
            let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
            load_lessons_for(&mut conn, &ids).await?
        } else {
            HashMap::new()
        };

        let content = rows
            .into_iter()
            .map(|row| {
                let owned = lessons.remove(&row.id).unwrap_or_default();
                row.into_domain(owned)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, request, to_count(total)))
    }
}

fn push_status_filter(query: &mut QueryBuilder<'_, Sqlite>, status: Option<Status>) {
    if let Some(status) = status {
        query.push(" WHERE status = ").push_bind(status.as_str());
    }
}

async fn fetch_course(
    conn: &mut SqliteConnection,
    id: i64,
    status: Option<Status>,
    with_lessons: bool,
) -> Result<Option<Course>, StorageError> {
    let mut query = QueryBuilder::<Sqlite>::new(COURSE_COLUMNS);
    query.push(" WHERE id = ").push_bind(id);
    if let Some(status) = status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    let row: Option<CourseRow> = query.build_query_as().fetch_optional(&mut *conn).await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let lessons = if with_lessons {
        load_lessons_for(conn, &[row.id])
            .await?
            .remove(&row.id)
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    row.into_domain(lessons).map(Some)
}

/// Raw `courses` row with enumerations still in their stored label form.
#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: i64,
    name: String,
    category: String,
    status: String,
}

impl CourseRow {
    fn into_domain(self, lessons: Vec<Lesson>) -> Result<Course, StorageError> {
        Ok(Course {
            id: self.id,
            name: self.name,
            category: self.category.parse()?,
            status: self.status.parse()?,
            lessons,
        })
    }
}
