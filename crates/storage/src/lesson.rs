use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use course_catalog_core::{Lesson, LessonDraft, LessonSort, Page, PageRequest};

use crate::{is_foreign_key_violation, order_clause, to_count, StorageError};

const LESSON_COLUMNS: &str = "SELECT id, name, youtube_url, course_id FROM lessons";

/// Repository for lessons addressed on their own rather than through a course.
#[derive(Clone)]
pub struct LessonRepository {
    pool: SqlitePool,
}

impl LessonRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(
        &self,
        request: &PageRequest<LessonSort>,
    ) -> Result<Page<Lesson>, StorageError> {
        self.fetch_page(LessonFilter::None, request).await
    }

    /// Lists the lessons of one course. An unknown course yields an empty page.
    pub async fn find_by_course(
        &self,
        course_id: i64,
        request: &PageRequest<LessonSort>,
    ) -> Result<Page<Lesson>, StorageError> {
        self.fetch_page(LessonFilter::Course(course_id), request)
            .await
    }

    /// Case-insensitive substring match on the lesson name.
    pub async fn find_by_name_containing(
        &self,
        fragment: &str,
        request: &PageRequest<LessonSort>,
    ) -> Result<Page<Lesson>, StorageError> {
        self.fetch_page(LessonFilter::NameContains(like_pattern(fragment)), request)
            .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Lesson>, StorageError> {
        let row: Option<LessonRow> = sqlx::query_as(&format!("{LESSON_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Lesson::from))
    }

    /// Returns the first lesson pointing at the given video token.
    pub async fn find_by_youtube_url(&self, token: &str) -> Result<Option<Lesson>, StorageError> {
        let row: Option<LessonRow> = sqlx::query_as(&format!(
            "{LESSON_COLUMNS} WHERE youtube_url = ? ORDER BY id ASC LIMIT 1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Lesson::from))
    }

    /// Adds a lesson to an existing course.
    ///
    /// Fails with [`StorageError::MissingCourse`] when the course row is absent.
    pub async fn insert(&self, course_id: i64, draft: &LessonDraft) -> Result<Lesson, StorageError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = insert_lessons(&mut tx, course_id, std::slice::from_ref(draft)).await?;
        tx.commit().await?;
        inserted.pop().ok_or(StorageError::MissingCourse(course_id))
    }

    /// Overwrites name and video token. The owning course never changes.
    pub async fn update(&self, id: i64, draft: &LessonDraft) -> Result<Option<Lesson>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row: Option<LessonRow> = sqlx::query_as(
            "UPDATE lessons SET name = ?, youtube_url = ? WHERE id = ? \
             RETURNING id, name, youtube_url, course_id",
        )
        .bind(&draft.name)
        .bind(&draft.youtube_url)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row.map(Lesson::from))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_page(
        &self,
        filter: LessonFilter,
        request: &PageRequest<LessonSort>,
    ) -> Result<Page<Lesson>, StorageError> {
        let mut conn = self.pool.acquire().await?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM lessons");
        filter.push(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;

        let mut query = QueryBuilder::<Sqlite>::new(LESSON_COLUMNS);
        filter.push(&mut query);
        query.push(order_clause(request));
        query
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());
        let rows: Vec<LessonRow> = query.build_query_as().fetch_all(&mut *conn).await?;

        let content = rows.into_iter().map(Lesson::from).collect();
        Ok(Page::new(content, request, to_count(total)))
    }
}

enum LessonFilter {
    None,
    Course(i64),
    NameContains(String),
}

impl LessonFilter {
    fn push<'a>(&self, query: &mut QueryBuilder<'a, Sqlite>) {
        match self {
            Self::None => {}
            Self::Course(course_id) => {
                query.push(" WHERE course_id = ").push_bind(*course_id);
            }
            Self::NameContains(pattern) => {
                query
                    .push(" WHERE name LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
        }
    }
}

/// Builds a `LIKE` pattern that treats `%`, `_` and `\` in the fragment literally.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Inserts lessons for a course on the given connection, preserving input order.
pub(crate) async fn insert_lessons(
    conn: &mut SqliteConnection,
    course_id: i64,
    drafts: &[LessonDraft],
) -> Result<Vec<Lesson>, StorageError> {
    let mut lessons = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let row: LessonRow = sqlx::query_as(
            "INSERT INTO lessons (name, youtube_url, course_id) VALUES (?, ?, ?) \
             RETURNING id, name, youtube_url, course_id",
        )
        .bind(&draft.name)
        .bind(&draft.youtube_url)
        .bind(course_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                StorageError::MissingCourse(course_id)
            } else {
                StorageError::Database(err)
            }
        })?;
        lessons.push(Lesson::from(row));
    }
    Ok(lessons)
}

/// Loads the lessons of several courses in one query, keyed by course id.
pub(crate) async fn load_lessons_for(
    conn: &mut SqliteConnection,
    course_ids: &[i64],
) -> Result<HashMap<i64, Vec<Lesson>>, StorageError> {
    let mut grouped: HashMap<i64, Vec<Lesson>> = HashMap::new();
    if course_ids.is_empty() {
        return Ok(grouped);
    }

    let mut query = QueryBuilder::<Sqlite>::new(LESSON_COLUMNS);
    query.push(" WHERE course_id IN (");
    let mut ids = query.separated(", ");
    for id in course_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(")");
    query.push(" ORDER BY course_id ASC, id ASC");

    let rows: Vec<LessonRow> = query.build_query_as().fetch_all(&mut *conn).await?;
    for row in rows {
        grouped
            .entry(row.course_id)
            .or_default()
            .push(Lesson::from(row));
    }
    Ok(grouped)
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LessonRow {
    id: i64,
    name: String,
    youtube_url: String,
    course_id: i64,
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            youtube_url: row.youtube_url,
            course_id: row.course_id,
        }
    }
}
