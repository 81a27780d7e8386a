mod common;

use axum::http::StatusCode;
use common::{CookieStore, TestApp, extract_csrf_token, get, location, post_form, spawn_app};
use studyhall::service::password;

async fn login_as(t: &TestApp, name: &str, email: &str, grade_id: i64) -> CookieStore {
    let hash = password::hash("abc12345").expect("hash");
    let student_id = t
        .storage
        .insert_student(name, email, &hash, grade_id)
        .await
        .expect("insert student");
    t.storage
        .create_progress_for_student(student_id, grade_id)
        .await
        .expect("create progress");

    let mut cookies = CookieStore::default();
    let (_, page) = get(&t.app, "/login", &mut cookies).await;
    let token = extract_csrf_token(&page);
    let (parts, _) = post_form(
        &t.app,
        "/login",
        &[
            ("email", email),
            ("password", "abc12345"),
            ("csrf_token", &token),
        ],
        &mut cookies,
    )
    .await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    cookies
}

#[tokio::test]
async fn subject_page_lists_lessons_in_order_with_progress() {
    let t = spawn_app("subject-order").await;
    let mut cookies = login_as(&t, "Ada", "ada@x.com", 3).await;

    let subject = t
        .storage
        .subjects_for_grade(1)
        .await
        .expect("subjects")
        .into_iter()
        .next()
        .expect("seeded subject");

    let (parts, body) = get(&t.app, &format!("/subject/{}", subject.id), &mut cookies).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains(&subject.name));

    // All twenty lessons, in ascending order.
    let mut last = 0;
    for n in 1..=20 {
        let marker = format!("<li value=\"{n}\">");
        let pos = body.find(&marker).unwrap_or_else(|| panic!("missing lesson {n}"));
        assert!(pos > last || n == 1, "lesson {n} out of order");
        last = pos;
    }

    // Lesson 1 is unlocked at registration time, the rest are not.
    let first = body.find("<li value=\"1\">").expect("lesson 1");
    let second = body.find("<li value=\"2\">").expect("lesson 2");
    assert!(body[first..second].contains(">unlocked<"));
    assert!(body[second..].contains(">locked<"));

    t.cleanup();
}

#[tokio::test]
async fn lessons_beyond_the_students_grade_show_no_progress() {
    let t = spawn_app("subject-beyond").await;
    // Grade 1 student: progress rows exist only for grade 1 lessons.
    let mut cookies = login_as(&t, "Ada", "ada@x.com", 1).await;

    let subject = t
        .storage
        .subjects_for_grade(2)
        .await
        .expect("subjects")
        .into_iter()
        .next()
        .expect("seeded subject");

    let (parts, body) = get(&t.app, &format!("/subject/{}", subject.id), &mut cookies).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("not started"));
    assert!(!body.contains(">unlocked<"));

    t.cleanup();
}

#[tokio::test]
async fn unknown_subject_renders_without_a_subject() {
    let t = spawn_app("subject-missing").await;
    let mut cookies = login_as(&t, "Ada", "ada@x.com", 3).await;

    let (parts, body) = get(&t.app, "/subject/99999", &mut cookies).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("No such subject."));

    t.cleanup();
}

#[tokio::test]
async fn subject_page_requires_a_session() {
    let t = spawn_app("subject-gate").await;
    let mut cookies = CookieStore::default();

    let (parts, _) = get(&t.app, "/subject/1", &mut cookies).await;
    assert_eq!(parts.status, StatusCode::SEE_OTHER);
    assert_eq!(location(&parts), "/login");

    t.cleanup();
}
