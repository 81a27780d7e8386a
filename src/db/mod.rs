//! Database module: models, schema, and storage for persistent state.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the `Storage` handle owning all SQL
//! - `seed.rs`: idempotent catalog bootstrap

pub mod models;
pub mod schema;
pub mod seed;
pub mod sqlite;

pub use models::{Grade, Lesson, Progress, Student, Subject};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, Storage, connect};
