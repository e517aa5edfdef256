//! Client configuration resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;

/// Overrides the backend base URL.
pub const API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

/// Overrides the directory holding persisted client state.
pub const DATA_DIR_ENV: &str = "LEARNASKILL_DATA_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Generation calls can take tens of seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// File name of the key-value state inside the data directory.
pub const STATE_FILE_NAME: &str = "client-state.json";

const DEFAULT_DATA_DIR_NAME: &str = ".learnaskill";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// `None` when no durable location could be determined.
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(API_URL_ENV)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = non_empty(DATA_DIR_ENV).map(PathBuf::from).or_else(|| {
            non_empty("HOME").map(|home| PathBuf::from(home).join(DEFAULT_DATA_DIR_NAME))
        });

        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            data_dir,
        }
    }

    pub fn state_file(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(STATE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.data_dir.is_none());
        assert!(config.state_file().is_none());
    }

    #[test]
    fn api_url_override_is_normalized() {
        let config =
            ClientConfig::from_lookup(lookup(&[(API_URL_ENV, "https://api.example.com/")]));
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn empty_api_url_falls_back_to_default() {
        let config = ClientConfig::from_lookup(lookup(&[(API_URL_ENV, "")]));
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn data_dir_prefers_explicit_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV, "/var/lib/learn"),
            ("HOME", "/home/ada"),
        ]));
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/learn")));
        assert_eq!(
            config.state_file(),
            Some(PathBuf::from("/var/lib/learn/client-state.json"))
        );
    }

    #[test]
    fn data_dir_falls_back_to_home() {
        let config = ClientConfig::from_lookup(lookup(&[("HOME", "/home/ada")]));
        assert_eq!(config.data_dir, Some(PathBuf::from("/home/ada/.learnaskill")));
    }
}
