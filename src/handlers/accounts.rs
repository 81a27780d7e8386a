//! Registration, login, and logout.

use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{error, info};

use crate::db::models::Grade;
use crate::error::AppError;
use crate::middleware::{csrf, flash, flash::Category, session};
use crate::router::AppState;
use crate::service::password;
use crate::service::validation::{RegistrationInput, validate_registration};
use crate::views;

const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred; please try again later.";

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

/// GET /register -> the form, with the full ordered grade list.
pub async fn register_form(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let grades = state.storage.list_grades().await?;
    Ok(render_register(jar, &grades))
}

/// POST /register -> validate, create the student and their progress rows,
/// then send them to the login form.
pub async fn register_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if !csrf::verify(&jar, &form.csrf_token) {
        return Ok(csrf::rejection());
    }

    let name = form.name.trim();
    let email = form.email.trim();
    let grade = form.grade.trim();
    let grades = state.storage.list_grades().await?;

    let grade_id = match validate_registration(
        RegistrationInput {
            name,
            email,
            password: &form.password,
            grade,
        },
        &grades,
    ) {
        Ok(id) => id,
        Err(messages) => {
            let mut jar = jar;
            for message in messages {
                jar = flash::push(jar, Category::Danger, message)?;
            }
            // Input values are not carried back into the form.
            return Ok(render_register(jar, &grades));
        }
    };

    if state.storage.find_student_by_email(email).await?.is_some() {
        let jar = flash::push(jar, Category::Danger, "User already exists. Please log in.")?;
        return Ok((jar, Redirect::to("/login")).into_response());
    }

    let password_hash = password::hash(&form.password)?;

    // Check-then-insert leaves a race on the email UNIQUE constraint; a
    // violation lands in the generic internal-error path below.
    let student_id = match state
        .storage
        .insert_student(name, email, &password_hash, grade_id)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "database error creating student");
            let jar = flash::push(jar, Category::Danger, INTERNAL_ERROR_MESSAGE)?;
            return Ok(render_register(jar, &grades));
        }
    };

    match state
        .storage
        .create_progress_for_student(student_id, grade_id)
        .await
    {
        Ok(created) => {
            info!(student_id, grade_id, progress_rows = created, "registered new student");
        }
        Err(e) => {
            error!(error = %e, student_id, "database error creating progress rows");
            let jar = flash::push(jar, Category::Danger, INTERNAL_ERROR_MESSAGE)?;
            return Ok(render_register(jar, &grades));
        }
    }

    let jar = flash::push(jar, Category::Success, "Registration successful! Please log in.")?;
    Ok((jar, Redirect::to("/login")).into_response())
}

/// GET /login
pub async fn login_form(jar: PrivateCookieJar) -> Response {
    render_login(jar)
}

/// POST /login -> exact email lookup, hash verification, session on success.
/// Failure stays deliberately vague about which factor was wrong.
pub async fn login_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !csrf::verify(&jar, &form.csrf_token) {
        return Ok(csrf::rejection());
    }

    let student = state.storage.find_student_by_email(form.email.trim()).await?;
    if let Some(student) = student
        && password::verify(&student.password_hash, &form.password)
    {
        let jar = session::establish(jar, &student)?;
        let jar = flash::push(
            jar,
            Category::Success,
            format!("Login successful! Welcome back, {}", student.name),
        )?;
        info!(student_id = student.id, "student logged in");
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    }

    let jar = flash::push(jar, Category::Danger, "Invalid email or password.")?;
    Ok(render_login(jar))
}

/// GET /logout -> clear the session and return to the landing page.
pub async fn logout(jar: PrivateCookieJar) -> Result<Response, AppError> {
    let jar = session::clear(jar);
    let jar = flash::push(jar, Category::Info, "You have been logged out.")?;
    Ok((jar, Redirect::to("/")).into_response())
}

fn render_register(jar: PrivateCookieJar, grades: &[Grade]) -> Response {
    let (jar, flashes) = flash::take(jar);
    let (jar, token) = csrf::ensure_token(jar);
    (jar, Html(views::register_page(grades, &token, &flashes))).into_response()
}

fn render_login(jar: PrivateCookieJar) -> Response {
    let (jar, flashes) = flash::take(jar);
    let (jar, token) = csrf::ensure_token(jar);
    (jar, Html(views::login_page(&token, &flashes))).into_response()
}
