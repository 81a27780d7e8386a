//! Shared plumbing for router-level tests. Each test gets a seeded
//! temp-file SQLite database behind the real router, plus a minimal cookie
//! store so multi-request flows behave like a browser.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, header, response::Parts};
use axum_extra::extract::cookie::Key;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

use studyhall::db::{self, Storage};
use studyhall::router::{AppState, app_router};

pub struct TestApp {
    pub app: Router,
    pub storage: Storage,
    pub db_path: PathBuf,
}

impl TestApp {
    pub fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub async fn spawn_app(tag: &str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "studyhall-{}-{}-{}.sqlite",
        tag,
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let storage = db::connect(&database_url).await.expect("connect database");
    db::seed::seed(&storage).await.expect("seed catalog");

    let state = AppState::new(storage.clone(), Key::generate());
    TestApp {
        app: app_router(state),
        storage,
        db_path,
    }
}

/// Cookie jar that replays Set-Cookie headers on subsequent requests.
#[derive(Debug, Default, Clone)]
pub struct CookieStore {
    cookies: BTreeMap<String, String>,
}

impl CookieStore {
    pub fn absorb(&mut self, parts: &Parts) {
        for set_cookie in parts.headers.get_all(header::SET_COOKIE) {
            let Ok(raw) = set_cookie.to_str() else {
                continue;
            };
            let mut segments = raw.split(';');
            let Some(pair) = segments.next() else {
                continue;
            };
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let removal = value.is_empty()
                || segments.any(|attr| attr.trim().eq_ignore_ascii_case("Max-Age=0"));
            if removal {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.to_string());
            }
        }
    }

    pub fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

}

pub async fn get(app: &Router, path: &str, cookies: &mut CookieStore) -> (Parts, String) {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(header_value) = cookies.header() {
        builder = builder.header(header::COOKIE, header_value);
    }
    let request = builder.body(Body::empty()).expect("build request");
    send(app, request, cookies).await
}

pub async fn post_form(
    app: &Router,
    path: &str,
    fields: &[(&str, &str)],
    cookies: &mut CookieStore,
) -> (Parts, String) {
    let body = fields
        .iter()
        .map(|(name, value)| format!("{}={}", urlencode(name), urlencode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(header_value) = cookies.header() {
        builder = builder.header(header::COOKIE, header_value);
    }
    let request = builder.body(Body::from(body)).expect("build request");
    send(app, request, cookies).await
}

async fn send(app: &Router, request: Request<Body>, cookies: &mut CookieStore) -> (Parts, String) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let (parts, body) = response.into_parts();
    cookies.absorb(&parts);
    let bytes = to_bytes(body, usize::MAX).await.expect("read body");
    let text = String::from_utf8(bytes.to_vec()).expect("body was not utf-8");
    (parts, text)
}

/// Pull the hidden CSRF field out of a rendered form.
pub fn extract_csrf_token(page: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = page.find(marker).expect("no csrf field in page") + marker.len();
    let rest = &page[start..];
    let end = rest.find('"').expect("unterminated csrf value");
    rest[..end].to_string()
}

pub fn location(parts: &Parts) -> &str {
    parts
        .headers
        .get(header::LOCATION)
        .expect("no Location header")
        .to_str()
        .expect("Location header was not utf-8")
}

fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
