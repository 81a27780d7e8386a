use chrono::{DateTime, Utc};
use serde::Serialize;

/// A year/level grouping. Grade ids form a linear ordering used for
/// "grade <= N" access checks.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub grade_id: i64,
    /// Declared but never populated by any handler; progression semantics
    /// were never finished upstream and are intentionally not invented here.
    pub current_grade_id: Option<i64>,
    pub unlocked_grade_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub grade_id: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_path: Option<String>,
    pub notes_path: Option<String>,
    pub sort_order: i64,
    pub subject_id: i64,
    pub is_locked: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Progress {
    pub id: i64,
    pub student_id: i64,
    pub lesson_id: i64,
    pub completed: bool,
    pub score: Option<f64>,
    pub unlocked: bool,
}
