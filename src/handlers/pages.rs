//! Read-only pages: landing, dashboard, subject lessons.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use std::collections::HashMap;

use crate::db::models::Progress;
use crate::error::AppError;
use crate::middleware::{flash, session, session::CurrentStudent};
use crate::router::AppState;
use crate::views;

/// GET /
pub async fn index(jar: PrivateCookieJar) -> Response {
    let logged_in = session::current(&jar).is_some();
    let (jar, flashes) = flash::take(jar);
    (jar, Html(views::index_page(&flashes, logged_in))).into_response()
}

/// GET /dashboard -> the accessible (grade, subjects) groupings, i.e. every
/// grade with id up to the student's own.
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentStudent(current): CurrentStudent,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let Some(student) = state.storage.find_student_by_id(current.student_id).await? else {
        // The session outlived its student row.
        let jar = session::clear(jar);
        return Ok((jar, Redirect::to("/login")).into_response());
    };

    let grades = state.storage.grades_up_to(student.grade_id).await?;
    let mut groups = Vec::with_capacity(grades.len());
    for grade in grades {
        let subjects = state.storage.subjects_for_grade(grade.id).await?;
        groups.push((grade, subjects));
    }

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(views::dashboard_page(&student.name, &groups, &flashes))).into_response())
}

/// GET /subject/{subject_id} -> the subject's lessons in order, each paired
/// with the current student's progress row if one exists. An unknown
/// subject id still renders, with no subject.
pub async fn subject_lessons(
    State(state): State<AppState>,
    CurrentStudent(current): CurrentStudent,
    Path(subject_id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let subject = state.storage.find_subject(subject_id).await?;

    let rows = match &subject {
        Some(subject) => {
            let lessons = state.storage.lessons_for_subject(subject.id).await?;
            let progress = state
                .storage
                .progress_for_subject(current.student_id, subject.id)
                .await?;
            let mut by_lesson: HashMap<i64, Progress> =
                progress.into_iter().map(|p| (p.lesson_id, p)).collect();
            lessons
                .into_iter()
                .map(|lesson| {
                    let p = by_lesson.remove(&lesson.id);
                    (lesson, p)
                })
                .collect()
        }
        None => Vec::new(),
    };

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(views::subject_page(subject.as_ref(), &rows, &flashes))).into_response())
}
