use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;

use crate::db::Storage;
use crate::handlers::{accounts, pages};

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    key: Key,
}

impl AppState {
    pub fn new(storage: Storage, key: Key) -> Self {
        Self { storage, key }
    }
}

// Lets the private cookie jar pull its encryption key out of the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route(
            "/register",
            get(accounts::register_form).post(accounts::register_submit),
        )
        .route(
            "/login",
            get(accounts::login_form).post(accounts::login_submit),
        )
        .route("/dashboard", get(pages::dashboard))
        .route("/logout", get(accounts::logout))
        .route("/subject/{subject_id}", get(pages::subject_lessons))
        .with_state(state)
}
