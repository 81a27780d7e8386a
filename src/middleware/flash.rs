//! One-shot flash messages, carried across a redirect in a private cookie
//! and drained on the next rendered page.

use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::session::{build_cookie, clear_cookie};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Danger,
    Success,
    Info,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Danger => "danger",
            Category::Success => "success",
            Category::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flash {
    pub category: Category,
    pub message: String,
}

/// Append a message to the pending flash list.
pub fn push(
    jar: PrivateCookieJar,
    category: Category,
    message: impl Into<String>,
) -> Result<PrivateCookieJar, AppError> {
    let mut pending = peek(&jar);
    pending.push(Flash {
        category,
        message: message.into(),
    });
    let value = serde_json::to_string(&pending)?;
    Ok(jar.add(build_cookie(FLASH_COOKIE, value)))
}

/// Drain the pending flash list for rendering.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<Flash>) {
    let pending = peek(&jar);
    let jar = jar.remove(clear_cookie(FLASH_COOKIE));
    (jar, pending)
}

fn peek(jar: &PrivateCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}
