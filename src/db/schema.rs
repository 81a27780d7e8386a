//! SQL DDL for the studyhall store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT on every table
/// - booleans stored as INTEGER 0/1
/// - `students.created_at` stored as RFC3339 text
/// - `lessons.sort_order` is the lesson position within its subject,
///   unique per subject
/// - `progress` is unique per (student, lesson) pair
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS grades (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    grade_id INTEGER NOT NULL REFERENCES grades(id),
    current_grade_id INTEGER NULL REFERENCES grades(id),
    unlocked_grade_id INTEGER NULL REFERENCES grades(id),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    grade_id INTEGER NOT NULL REFERENCES grades(id)
);

CREATE INDEX IF NOT EXISTS idx_subjects_grade ON subjects(grade_id);

CREATE TABLE IF NOT EXISTS lessons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NULL,
    video_path TEXT NULL,
    notes_path TEXT NULL,
    sort_order INTEGER NOT NULL,
    subject_id INTEGER NOT NULL REFERENCES subjects(id),
    is_locked INTEGER NOT NULL DEFAULT 1,
    UNIQUE(subject_id, sort_order)
);

CREATE INDEX IF NOT EXISTS idx_lessons_subject ON lessons(subject_id);

CREATE TABLE IF NOT EXISTS progress (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students(id),
    lesson_id INTEGER NOT NULL REFERENCES lessons(id),
    completed INTEGER NOT NULL DEFAULT 0,
    score REAL NULL,
    unlocked INTEGER NOT NULL DEFAULT 0,
    UNIQUE(student_id, lesson_id)
);

CREATE INDEX IF NOT EXISTS idx_progress_student ON progress(student_id);
"#;
