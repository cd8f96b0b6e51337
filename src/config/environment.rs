use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_RETRY_TIME_SECS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "main.log";

const REQUIRED_SECRETS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Environment configuration
/// Loads and validates environment variables once at startup
#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub start_cursor: i64,
    pub report_errors: bool,
    pub log_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_SECRETS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingSecrets(missing));
        }

        let practicum_token = get("PRACTICUM_TOKEN").unwrap_or_default();
        let telegram_token = get("TELEGRAM_TOKEN").unwrap_or_default();
        let telegram_chat_id = get("TELEGRAM_CHAT_ID").unwrap_or_default();

        let endpoint = get("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let telegram_api_url = get("TELEGRAM_API_URL")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let retry_time = parse_or("RETRY_TIME", get("RETRY_TIME"), DEFAULT_RETRY_TIME_SECS)?;
        if retry_time == 0 {
            return Err(ConfigError::Invalid {
                key: "RETRY_TIME",
                value: "0".to_string(),
            });
        }
        let request_timeout = parse_or(
            "REQUEST_TIMEOUT",
            get("REQUEST_TIMEOUT"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let start_cursor = parse_or("POLL_FROM_DATE", get("POLL_FROM_DATE"), 0i64)?;
        let report_errors = match get("REPORT_ERRORS") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "REPORT_ERRORS",
                value: raw,
            })?,
        };
        let log_file = log_file_from_lookup(&lookup);

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint,
            telegram_api_url,
            poll_interval: Duration::from_secs(retry_time),
            request_timeout: Duration::from_secs(request_timeout),
            start_cursor,
            report_errors,
            log_file,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .field("start_cursor", &self.start_cursor)
            .field("report_errors", &self.report_errors)
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Log file path, resolved on its own so logging can start before the
/// rest of the configuration is known to be valid.
pub fn log_file_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_FILE")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
}

/// Log file path from the process environment after `.env` has been loaded
pub fn log_file_from_env() -> String {
    log_file_from_lookup(|key| env::var(key).ok())
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
