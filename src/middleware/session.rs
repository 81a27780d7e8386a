//! Cookie-backed login session.
//!
//! A logged-in state is represented solely by the presence of the session
//! cookie; there is no expiry and no re-validation against the store in the
//! gate itself. The cookie payload is encrypted and authenticated by the
//! private jar, so its contents cannot be forged client-side.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::db::models::Student;
use crate::error::AppError;
use crate::router::AppState;

pub const SESSION_COOKIE: &str = "session";

/// What the session remembers about the authenticated student: the id and
/// the display name, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStudent {
    pub student_id: i64,
    pub name: String,
}

/// Derive the cookie encryption key from the configured secret, falling
/// back to an ephemeral random key (sessions then invalidate on restart).
/// `Key::derive_from` needs at least 32 bytes of master key.
pub fn cookie_key(cfg: &Config) -> Key {
    match cfg.secret_key.as_deref() {
        Some(secret) if secret.len() >= 32 => Key::derive_from(secret.as_bytes()),
        Some(_) => {
            warn!("secret_key is shorter than 32 bytes; using an ephemeral key instead");
            Key::generate()
        }
        None => {
            warn!("no secret_key configured; sessions will not survive a restart");
            Key::generate()
        }
    }
}

pub fn establish(jar: PrivateCookieJar, student: &Student) -> Result<PrivateCookieJar, AppError> {
    let data = SessionStudent {
        student_id: student.id,
        name: student.name.clone(),
    };
    let value = serde_json::to_string(&data)?;
    Ok(jar.add(build_cookie(SESSION_COOKIE, value)))
}

pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

pub fn current(jar: &PrivateCookieJar) -> Option<SessionStudent> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Extractor gating protected pages: absent or undecipherable session
/// redirects to the login form.
#[derive(Debug, Clone)]
pub struct CurrentStudent(pub SessionStudent);

impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(err) => match err {},
        };
        match current(&jar) {
            Some(session) => Ok(Self(session)),
            None => Err(Redirect::to("/login").into_response()),
        }
    }
}

pub(crate) fn build_cookie(name: &str, value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub(crate) fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
