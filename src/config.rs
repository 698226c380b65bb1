use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_RETRIEVAL_BASE_URL: &str = "https://api.ragie.ai";
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings shared by the retrieval and completion clients. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub retrieval_api_key: String,
    pub completion_api_key: String,
    pub meeting_collection: String,
    pub agreement_collection: String,
    pub top_k: u32,
    pub rerank: bool,
    pub model: String,
    pub retrieval_base_url: String,
    pub completion_base_url: String,
    /// Page size for the "refresh" listing.
    pub recent_limit: u32,
    pub request_timeout: Duration,
}

impl Config {
    /// Load from the process environment (`.env` is honoured by `dotenv::var`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are treated the same as unset ones.
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let retrieval_api_key = required("RAGIE_API_KEY")?;
        let completion_api_key = required("OPENAI_API_KEY")?;

        let top_k = parse_or("RETRIEVAL_TOP_K", get("RETRIEVAL_TOP_K"), 8u32)?;
        if top_k == 0 {
            return Err(ConfigError::Invalid {
                key: "RETRIEVAL_TOP_K",
                value: "0".to_string(),
            });
        }
        let rerank = match get("RETRIEVAL_RERANK") {
            None => true,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "RETRIEVAL_RERANK",
                value: v,
            })?,
        };
        let recent_limit = parse_or("RECENT_MEETINGS_LIMIT", get("RECENT_MEETINGS_LIMIT"), 3u32)?;
        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS"), 30u64)?;
        // A zero timeout would fail every request before it is sent.
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            retrieval_api_key,
            completion_api_key,
            meeting_collection: get("MEETING_COLLECTION")
                .unwrap_or_else(|| "test_meetings".to_string()),
            agreement_collection: get("AGREEMENT_COLLECTION")
                .unwrap_or_else(|| "test_client_agreements".to_string()),
            top_k,
            rerank,
            model: get("LLM_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            retrieval_base_url: get("RAGIE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_RETRIEVAL_BASE_URL.to_string()),
            completion_base_url: get("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_BASE_URL.to_string()),
            recent_limit,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
