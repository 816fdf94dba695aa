//! Service defaults and runtime configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::runtime::LoadPolicy;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variable overriding the artifact directory
pub const ARTIFACTS_ENV: &str = "COMMENT_GUARD_ARTIFACTS";

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all?fields=name";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

pub const MAX_QUERY_CHARS: usize = 100;
pub const MAX_COMMENT_CHARS: usize = 5_000;
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Returns the default artifact directory path
pub fn default_artifacts_dir() -> PathBuf {
    // 1. Check environment variable
    if let Ok(path) = env::var(ARTIFACTS_ENV) {
        return PathBuf::from(path);
    }

    // 2. Artifacts shipped alongside the working directory
    let local = PathBuf::from("artifacts");
    if local.is_dir() {
        return local;
    }

    // 3. Use platform-specific data directory
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("comment-guard").join("artifacts");
    }

    // 4. If all else fails, use system temp directory
    env::temp_dir().join("comment-guard").join("artifacts")
}

/// Everything the service needs to start, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub artifacts_dir: PathBuf,
    pub load_policy: LoadPolicy,
    pub countries_url: String,
    pub lookup_timeout: Duration,
    pub suggestion_limit: usize,
    pub max_query_chars: usize,
    pub max_comment_chars: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            artifacts_dir: default_artifacts_dir(),
            load_policy: LoadPolicy::Eager,
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            max_query_chars: MAX_QUERY_CHARS,
            max_comment_chars: MAX_COMMENT_CHARS,
        }
    }
}

impl ServiceConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
