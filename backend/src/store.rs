use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use sqlx::PgPool;
use tracing::error;
use shared::models::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found")]
    NotFound,
    #[error("Failed to acquire store lock")]
    LockFailed,
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Persistence for lecturers and courses.
///
/// `average_votes_by_lecturer` yields one entry per lecturer that owns at
/// least one course; an empty map means there were no rows to aggregate.
#[rocket::async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_lecturer(&self, new: &NewLecturer) -> Result<Lecturer, StoreError>;
    async fn create_course(&self, new: &NewCourse) -> Result<Course, StoreError>;
    async fn lecturer(&self, id: LecturerId) -> Result<Option<Lecturer>, StoreError>;
    async fn course(&self, id: CourseId) -> Result<Option<Course>, StoreError>;
    async fn lecturers(&self) -> Result<Vec<Lecturer>, StoreError>;
    async fn courses_by_votes(&self) -> Result<Vec<Course>, StoreError>;
    async fn save_lecturer(&self, lecturer: &Lecturer) -> Result<(), StoreError>;
    async fn save_course(&self, course: &Course) -> Result<(), StoreError>;
    async fn delete_lecturer(&self, id: LecturerId) -> Result<bool, StoreError>;
    async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError>;
    async fn count(&self, kind: EntityKind) -> Result<i64, StoreError>;
    async fn average_votes(&self) -> Result<Option<f64>, StoreError>;
    async fn average_votes_by_lecturer(&self) -> Result<BTreeMap<LecturerId, f64>, StoreError>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[rocket::async_trait]
impl EntityStore for PgStore {
    async fn create_lecturer(&self, new: &NewLecturer) -> Result<Lecturer, StoreError> {
        let lecturer = sqlx::query_as::<_, Lecturer>(
            "INSERT INTO scorecard.lecturers (first_name, last_name)
             VALUES ($1, $2)
             RETURNING id, first_name, last_name"
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(lecturer)
    }

    async fn create_course(&self, new: &NewCourse) -> Result<Course, StoreError> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO scorecard.courses (course_title, votes, lecturer_id)
             VALUES ($1, $2, $3)
             RETURNING id, course_title, votes, lecturer_id"
        )
        .bind(&new.course_title)
        .bind(new.votes)
        .bind(new.lecturer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => StoreError::NotFound,
            other => other.into(),
        })
    }

    async fn lecturer(&self, id: LecturerId) -> Result<Option<Lecturer>, StoreError> {
        let lecturer = sqlx::query_as::<_, Lecturer>(
            "SELECT id, first_name, last_name FROM scorecard.lecturers WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lecturer)
    }

    async fn course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            "SELECT id, course_title, votes, lecturer_id FROM scorecard.courses WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    async fn lecturers(&self) -> Result<Vec<Lecturer>, StoreError> {
        let lecturers = sqlx::query_as::<_, Lecturer>(
            "SELECT id, first_name, last_name FROM scorecard.lecturers ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(lecturers)
    }

    async fn courses_by_votes(&self) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, course_title, votes, lecturer_id FROM scorecard.courses
             ORDER BY votes DESC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    async fn save_lecturer(&self, lecturer: &Lecturer) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE scorecard.lecturers SET first_name = $2, last_name = $3 WHERE id = $1"
        )
        .bind(lecturer.id)
        .bind(&lecturer.first_name)
        .bind(&lecturer.last_name)
        .execute(&self.pool)
        .await?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn save_course(&self, course: &Course) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE scorecard.courses SET course_title = $2, votes = $3, lecturer_id = $4 WHERE id = $1"
        )
        .bind(course.id)
        .bind(&course.course_title)
        .bind(course.votes)
        .bind(course.lecturer_id)
        .execute(&self.pool)
        .await?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn delete_lecturer(&self, id: LecturerId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM scorecard.lecturers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM scorecard.courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, kind: EntityKind) -> Result<i64, StoreError> {
        let sql = match kind {
            EntityKind::Lecturer => "SELECT COUNT(*) FROM scorecard.lecturers",
            EntityKind::Course => "SELECT COUNT(*) FROM scorecard.courses",
        };
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn average_votes(&self) -> Result<Option<f64>, StoreError> {
        let mean: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(votes)::DOUBLE PRECISION FROM scorecard.courses"
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(mean)
    }

    async fn average_votes_by_lecturer(&self) -> Result<BTreeMap<LecturerId, f64>, StoreError> {
        let rows: Vec<(LecturerId, f64)> = sqlx::query_as(
            "SELECT lecturer_id, AVG(votes)::DOUBLE PRECISION
             FROM scorecard.courses
             GROUP BY lecturer_id"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}

#[derive(Debug, Default)]
struct Tables {
    lecturers: BTreeMap<LecturerId, Lecturer>,
    courses: BTreeMap<CourseId, Course>,
    next_lecturer_id: LecturerId,
    next_course_id: CourseId,
}

/// Process-local store, used for tests and local runs without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|e| {
            error!("Failed to acquire store lock: {}", e);
            StoreError::LockFailed
        })
    }
}

#[rocket::async_trait]
impl EntityStore for MemoryStore {
    async fn create_lecturer(&self, new: &NewLecturer) -> Result<Lecturer, StoreError> {
        let mut tables = self.tables()?;
        tables.next_lecturer_id += 1;
        let lecturer = Lecturer {
            id: tables.next_lecturer_id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
        };
        tables.lecturers.insert(lecturer.id, lecturer.clone());
        Ok(lecturer)
    }

    async fn create_course(&self, new: &NewCourse) -> Result<Course, StoreError> {
        let mut tables = self.tables()?;
        if !tables.lecturers.contains_key(&new.lecturer_id) {
            return Err(StoreError::NotFound);
        }
        tables.next_course_id += 1;
        let course = Course {
            id: tables.next_course_id,
            course_title: new.course_title.clone(),
            votes: new.votes,
            lecturer_id: new.lecturer_id,
        };
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn lecturer(&self, id: LecturerId) -> Result<Option<Lecturer>, StoreError> {
        Ok(self.tables()?.lecturers.get(&id).cloned())
    }

    async fn course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        Ok(self.tables()?.courses.get(&id).cloned())
    }

    async fn lecturers(&self) -> Result<Vec<Lecturer>, StoreError> {
        Ok(self.tables()?.lecturers.values().cloned().collect())
    }

    async fn courses_by_votes(&self) -> Result<Vec<Course>, StoreError> {
        let mut courses: Vec<Course> = self.tables()?.courses.values().cloned().collect();
        // ids are already ascending, so a stable sort keeps them as tie-break
        courses.sort_by(|a, b| b.votes.cmp(&a.votes));
        Ok(courses)
    }

    async fn save_lecturer(&self, lecturer: &Lecturer) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let stored = tables.lecturers.get_mut(&lecturer.id).ok_or(StoreError::NotFound)?;
        *stored = lecturer.clone();
        Ok(())
    }

    async fn save_course(&self, course: &Course) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if !tables.lecturers.contains_key(&course.lecturer_id) {
            return Err(StoreError::NotFound);
        }
        let stored = tables.courses.get_mut(&course.id).ok_or(StoreError::NotFound)?;
        *stored = course.clone();
        Ok(())
    }

    async fn delete_lecturer(&self, id: LecturerId) -> Result<bool, StoreError> {
        let mut tables = self.tables()?;
        if tables.lecturers.remove(&id).is_none() {
            return Ok(false);
        }
        tables.courses.retain(|_, course| course.lecturer_id != id);
        Ok(true)
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        Ok(self.tables()?.courses.remove(&id).is_some())
    }

    async fn count(&self, kind: EntityKind) -> Result<i64, StoreError> {
        let tables = self.tables()?;
        let count = match kind {
            EntityKind::Lecturer => tables.lecturers.len(),
            EntityKind::Course => tables.courses.len(),
        };
        Ok(count as i64)
    }

    async fn average_votes(&self) -> Result<Option<f64>, StoreError> {
        let tables = self.tables()?;
        if tables.courses.is_empty() {
            return Ok(None);
        }
        let total: i64 = tables.courses.values().map(|c| i64::from(c.votes)).sum();
        Ok(Some(total as f64 / tables.courses.len() as f64))
    }

    async fn average_votes_by_lecturer(&self) -> Result<BTreeMap<LecturerId, f64>, StoreError> {
        let tables = self.tables()?;
        let mut groups: HashMap<LecturerId, (i64, usize)> = HashMap::new();
        for course in tables.courses.values() {
            let (total, count) = groups.entry(course.lecturer_id).or_insert((0, 0));
            *total += i64::from(course.votes);
            *count += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(lecturer_id, (total, count))| (lecturer_id, total as f64 / count as f64))
            .collect())
    }
}
