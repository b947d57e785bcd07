use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

const LOG_FILE_VAR: &str = "LOG_FILE";

/// Credentials the watcher cannot start without.
const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// OAuth token for the homework status API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Homework status endpoint
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Fixed pause between polling cycles in seconds (default: 600)
    pub retry_period_secs: u64,

    /// Append logs to this file instead of stdout
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as absent. Every missing credential is reported
    /// in a single error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| non_blank(lookup(key));

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        let required = |key: &str| {
            get(key).ok_or_else(|| anyhow::anyhow!("{key} environment variable is required"))
        };

        let retry_period_secs: u64 = get("RETRY_PERIOD_SECS")
            .unwrap_or_else(|| "600".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("RETRY_PERIOD_SECS must be a valid u64"))?;
        if retry_period_secs == 0 {
            anyhow::bail!("RETRY_PERIOD_SECS must be greater than zero");
        }

        Ok(Self {
            practicum_token: required("PRACTICUM_TOKEN")?,
            telegram_token: required("TELEGRAM_TOKEN")?,
            telegram_chat_id: required("TELEGRAM_CHAT_ID")?,
            practicum_endpoint: get("PRACTICUM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_period_secs,
            log_file: Self::log_file_from_lookup(&lookup),
        })
    }

    /// Resolve `LOG_FILE` alone, with the same blank-means-absent rule.
    ///
    /// Logging has to be set up before a configuration error can be reported,
    /// so this works even when the rest of the configuration is invalid.
    pub fn log_file_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        non_blank(lookup(LOG_FILE_VAR)).map(PathBuf::from)
    }

    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PRACTICUM_TOKEN", "practicum-secret"),
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&full_env())).unwrap();
        assert_eq!(config.practicum_token, "practicum-secret");
        assert_eq!(config.telegram_chat_id, "42");
        assert_eq!(config.practicum_endpoint, DEFAULT_PRACTICUM_ENDPOINT);
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.retry_period(), Duration::from_secs(600));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_missing_credentials_reported_together() {
        let err = AppConfig::from_lookup(lookup_from(&[("TELEGRAM_TOKEN", "123:abc")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("PRACTICUM_TOKEN"));
        assert!(err.contains("TELEGRAM_CHAT_ID"));
        assert!(!err.contains("TELEGRAM_TOKEN,"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut env = full_env();
        env[2] = ("TELEGRAM_CHAT_ID", "  ");
        let err = AppConfig::from_lookup(lookup_from(&env)).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn test_overrides() {
        let mut env = full_env();
        env.push(("PRACTICUM_ENDPOINT", "http://localhost:9000/statuses/"));
        env.push(("RETRY_PERIOD_SECS", "5"));
        env.push(("LOG_FILE", "watcher.log"));
        let config = AppConfig::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.practicum_endpoint, "http://localhost:9000/statuses/");
        assert_eq!(config.retry_period(), Duration::from_secs(5));
        assert_eq!(config.log_file, Some(PathBuf::from("watcher.log")));
    }

    #[test]
    fn test_blank_log_file_means_stdout() {
        let mut env = full_env();
        env.push(("LOG_FILE", ""));
        let config = AppConfig::from_lookup(lookup_from(&env)).unwrap();
        assert!(config.log_file.is_none());

        // Resolved on its own even when credentials are missing.
        assert!(AppConfig::log_file_from_lookup(lookup_from(&[("LOG_FILE", " ")])).is_none());
        assert_eq!(
            AppConfig::log_file_from_lookup(lookup_from(&[("LOG_FILE", "main.log")])),
            Some(PathBuf::from("main.log"))
        );
    }

    #[test]
    fn test_invalid_retry_period_rejected() {
        let mut env = full_env();
        env.push(("RETRY_PERIOD_SECS", "soon"));
        assert!(AppConfig::from_lookup(lookup_from(&env)).is_err());

        let mut env = full_env();
        env.push(("RETRY_PERIOD_SECS", "0"));
        assert!(AppConfig::from_lookup(lookup_from(&env)).is_err());
    }
}
