use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Runtime configuration, sourced from `STUDYHALL_*` environment variables
/// on top of the defaults below. `.env` files are loaded by `main` before
/// the first access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite connection string. The file is created if missing.
    pub database_url: String,
    pub bind_addr: String,
    pub loglevel: String,
    /// Master key for session-cookie encryption. Must be at least 32 bytes;
    /// when unset an ephemeral key is generated and every session
    /// invalidates on restart.
    pub secret_key: Option<String>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:studyhall.db".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            secret_key: None,
            debug: false,
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("STUDYHALL_"))
        .extract()
        .expect("invalid STUDYHALL_* configuration")
});
