use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

const API_URL_VAR: &str = "COURSE_DESK_API_URL";
const TOKEN_DIR_VAR: &str = "COURSE_DESK_TOKEN_DIR";
const TIMEOUT_VAR: &str = "COURSE_DESK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API root, e.g. `http://localhost:8080/api`. No trailing slash.
    pub base_url: String,
    /// Directory holding the stored token (native builds only).
    pub token_dir: PathBuf,
    /// `None` means requests may hang as long as the server lets them.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_dir: default_token_dir(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Config::default();
        Self {
            base_url: var(API_URL_VAR)
                .map(|url| normalize_base_url(&url))
                .unwrap_or(defaults.base_url),
            token_dir: var(TOKEN_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_dir),
            request_timeout: try_parse::<u64>(TIMEOUT_VAR)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_token_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".course-desk")
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => {
            log::debug!("{key} not set, using default");
            None
        }
    }
}

fn try_parse<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: Display,
{
    var(key)?
        .trim()
        .parse()
        .map_err(|e| {
            log::warn!("Invalid {key} value, ignoring: {e}");
        })
        .ok()
}
