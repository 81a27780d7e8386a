use crate::db::models::{Grade, Lesson, Progress, Student, Subject};
use crate::db::schema::SQLITE_INIT;
use crate::db::seed::SeedGrade;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// All persistent state lives behind this handle; handlers never touch SQL
/// directly. The store is the sole owner of every row, and no object graph
/// survives across requests.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

/// Open (creating if missing) the SQLite database and initialize the schema.
pub async fn connect(database_url: &str) -> Result<Storage, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;
    let storage = Storage::new(pool);
    storage.init_schema().await?;
    Ok(storage)
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ----- grades -----

    pub async fn has_grades(&self) -> Result<bool, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM grades")
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn list_grades(&self) -> Result<Vec<Grade>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM grades ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_grade).collect()
    }

    /// Grades a student with the given grade id may access, in id order.
    pub async fn grades_up_to(&self, grade_id: i64) -> Result<Vec<Grade>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM grades WHERE id <= ? ORDER BY id")
            .bind(grade_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_grade).collect()
    }

    // ----- students -----

    /// Insert a new student row. `current_grade_id`/`unlocked_grade_id`
    /// start out NULL; nothing in the application writes them yet.
    pub async fn insert_student(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        grade_id: i64,
    ) -> Result<i64, AppError> {
        let created_at = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO students (name, email, password_hash, grade_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(grade_id)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, password_hash, grade_id,
               current_grade_id, unlocked_grade_id, created_at
               FROM students WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_student).transpose()
    }

    pub async fn find_student_by_id(&self, id: i64) -> Result<Option<Student>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, name, email, password_hash, grade_id,
               current_grade_id, unlocked_grade_id, created_at
               FROM students WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_student).transpose()
    }

    pub async fn count_students(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ----- subjects -----

    pub async fn subjects_for_grade(&self, grade_id: i64) -> Result<Vec<Subject>, AppError> {
        let rows = sqlx::query("SELECT id, name, grade_id FROM subjects WHERE grade_id = ? ORDER BY id")
            .bind(grade_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_subject).collect()
    }

    pub async fn find_subject(&self, id: i64) -> Result<Option<Subject>, AppError> {
        let row = sqlx::query("SELECT id, name, grade_id FROM subjects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_subject).transpose()
    }

    pub async fn count_subjects(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ----- lessons -----

    pub async fn lessons_for_subject(&self, subject_id: i64) -> Result<Vec<Lesson>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, title, description, video_path, notes_path,
               sort_order, subject_id, is_locked
               FROM lessons WHERE subject_id = ? ORDER BY sort_order"#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_lesson).collect()
    }

    pub async fn count_lessons(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lessons")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ----- progress -----

    /// Bulk-create one progress row per lesson belonging to any subject of
    /// any grade with id <= `grade_id`, in a single transaction. A lesson is
    /// unlocked exactly when its `sort_order` is 1. Returns the number of
    /// rows created.
    pub async fn create_progress_for_student(
        &self,
        student_id: i64,
        grade_id: i64,
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let lessons: Vec<(i64, i64)> = sqlx::query_as(
            r#"SELECT l.id, l.sort_order
               FROM lessons l
               JOIN subjects s ON s.id = l.subject_id
               WHERE s.grade_id <= ?
               ORDER BY l.id"#,
        )
        .bind(grade_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut created = 0u64;
        for (lesson_id, sort_order) in lessons {
            let unlocked = if sort_order == 1 { 1 } else { 0 };
            sqlx::query(
                r#"INSERT INTO progress (student_id, lesson_id, completed, score, unlocked)
                   VALUES (?, ?, 0, NULL, ?)"#,
            )
            .bind(student_id)
            .bind(lesson_id)
            .bind(unlocked)
            .execute(&mut *tx)
            .await?;
            created += 1;
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Progress rows for one student across one subject's lessons.
    pub async fn progress_for_subject(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Vec<Progress>, AppError> {
        let rows = sqlx::query(
            r#"SELECT p.id, p.student_id, p.lesson_id, p.completed, p.score, p.unlocked
               FROM progress p
               JOIN lessons l ON l.id = p.lesson_id
               WHERE p.student_id = ? AND l.subject_id = ?"#,
        )
        .bind(student_id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_progress).collect()
    }

    pub async fn progress_for_student(&self, student_id: i64) -> Result<Vec<Progress>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, student_id, lesson_id, completed, score, unlocked
               FROM progress WHERE student_id = ?"#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_progress).collect()
    }

    // ----- seeding -----

    /// Insert the full grade/subject/lesson catalog in one transaction.
    /// Callers gate on `has_grades` to keep startup idempotent.
    pub async fn insert_catalog(&self, catalog: &[SeedGrade]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for grade in catalog {
            let grade_id = sqlx::query("INSERT INTO grades (name) VALUES (?)")
                .bind(&grade.name)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

            for subject in &grade.subjects {
                let subject_id = sqlx::query("INSERT INTO subjects (name, grade_id) VALUES (?, ?)")
                    .bind(&subject.name)
                    .bind(grade_id)
                    .execute(&mut *tx)
                    .await?
                    .last_insert_rowid();

                for lesson in &subject.lessons {
                    let is_locked = if lesson.sort_order == 1 { 0 } else { 1 };
                    sqlx::query(
                        r#"INSERT INTO lessons
                           (title, description, video_path, notes_path, sort_order, subject_id, is_locked)
                           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
                    )
                    .bind(&lesson.title)
                    .bind(lesson.description.as_deref())
                    .bind(lesson.video_path.as_deref())
                    .bind(lesson.notes_path.as_deref())
                    .bind(lesson.sort_order)
                    .bind(subject_id)
                    .bind(is_locked)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn count_grades(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM grades")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ----- row mapping -----

    fn row_to_grade(row: SqliteRow) -> Result<Grade, AppError> {
        Ok(Grade {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }

    fn row_to_student(row: SqliteRow) -> Result<Student, AppError> {
        let created_at_str: String = row.try_get("created_at")?;
        let created_at: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);
        Ok(Student {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            grade_id: row.try_get("grade_id")?,
            current_grade_id: row.try_get("current_grade_id")?,
            unlocked_grade_id: row.try_get("unlocked_grade_id")?,
            created_at,
        })
    }

    fn row_to_subject(row: SqliteRow) -> Result<Subject, AppError> {
        Ok(Subject {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            grade_id: row.try_get("grade_id")?,
        })
    }

    fn row_to_lesson(row: SqliteRow) -> Result<Lesson, AppError> {
        let is_locked: i64 = row.try_get("is_locked")?;
        Ok(Lesson {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            video_path: row.try_get("video_path")?,
            notes_path: row.try_get("notes_path")?,
            sort_order: row.try_get("sort_order")?,
            subject_id: row.try_get("subject_id")?,
            is_locked: is_locked != 0,
        })
    }

    fn row_to_progress(row: SqliteRow) -> Result<Progress, AppError> {
        let completed: i64 = row.try_get("completed")?;
        let unlocked: i64 = row.try_get("unlocked")?;
        Ok(Progress {
            id: row.try_get("id")?,
            student_id: row.try_get("student_id")?,
            lesson_id: row.try_get("lesson_id")?,
            completed: completed != 0,
            score: row.try_get("score")?,
            unlocked: unlocked != 0,
        })
    }
}
