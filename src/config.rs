use std::{path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILE: &str = "tasklist.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Scheme and authority of the remote store; `/api/todo` is appended by the store.
    pub api_url: String,
    pub log_file: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.into(), log_file: PathBuf::from(DEFAULT_LOG_FILE), request_timeout: None }
    }
}

/// Loads `.env` if present, then resolves settings from the process environment.
pub fn load_settings() -> Settings {
    let _ = dotenvy::dotenv();
    settings_from(|key| std::env::var(key).ok())
}

pub fn settings_from(lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = lookup("TASKLIST_API_URL") {
        settings.api_url = normalize_api_url(&v);
    }
    if let Some(v) = lookup("TASKLIST_LOG_FILE") {
        if !v.trim().is_empty() { settings.log_file = PathBuf::from(v.trim()); }
    }
    if let Some(v) = lookup("TASKLIST_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = match v.trim().parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
        };
    }

    settings
}

fn normalize_api_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() { DEFAULT_API_URL.to_string() } else { raw.to_string() }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        settings_from(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_store() {
        let settings = from_pairs(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_url, "http://localhost:8000");
        assert!(settings.request_timeout.is_none());
    }

    #[test]
    fn api_url_is_trimmed_and_blank_falls_back() {
        assert_eq!(from_pairs(&[("TASKLIST_API_URL", " http://tasks.lan:9000/ ")]).api_url, "http://tasks.lan:9000");
        assert_eq!(from_pairs(&[("TASKLIST_API_URL", "  ")]).api_url, DEFAULT_API_URL);
    }

    #[test]
    fn timeout_accepts_positive_seconds_only() {
        assert_eq!(from_pairs(&[("TASKLIST_REQUEST_TIMEOUT_SECS", "5")]).request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(from_pairs(&[("TASKLIST_REQUEST_TIMEOUT_SECS", "0")]).request_timeout, None);
        assert_eq!(from_pairs(&[("TASKLIST_REQUEST_TIMEOUT_SECS", "soon")]).request_timeout, None);
    }

    #[test]
    fn log_file_override() {
        assert_eq!(from_pairs(&[("TASKLIST_LOG_FILE", "/tmp/t.log")]).log_file, PathBuf::from("/tmp/t.log"));
    }
}
