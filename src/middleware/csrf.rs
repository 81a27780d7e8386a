//! Cross-site request forgery protection for form submissions.
//!
//! A random token lives in a private cookie and is echoed back through a
//! hidden form field; the two are compared in constant time on every
//! state-mutating POST.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use subtle::ConstantTimeEq;
use time::Duration;
use uuid::Uuid;

pub const CSRF_COOKIE: &str = "csrf_token";

/// Return the browser's CSRF token, minting one if absent.
pub fn ensure_token(jar: PrivateCookieJar) -> (PrivateCookieJar, String) {
    if let Some(cookie) = jar.get(CSRF_COOKIE) {
        let token = cookie.value().to_string();
        return (jar, token);
    }
    let token = Uuid::new_v4().simple().to_string();
    let jar = jar.add(
        Cookie::build(Cookie::new(CSRF_COOKIE.to_string(), token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::hours(12))
            .build(),
    );
    (jar, token)
}

pub fn verify(jar: &PrivateCookieJar, submitted: &str) -> bool {
    let Some(cookie) = jar.get(CSRF_COOKIE) else {
        return false;
    };
    bool::from(submitted.as_bytes().ct_eq(cookie.value().as_bytes()))
}

pub fn rejection() -> Response {
    (
        StatusCode::FORBIDDEN,
        Html(
            "<!doctype html>\n<html><head><title>Forbidden</title></head>\
             <body><h1>Forbidden</h1><p>Invalid or missing CSRF token.</p></body></html>"
                .to_string(),
        ),
    )
        .into_response()
}
