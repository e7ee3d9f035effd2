//! Agent configuration resolution
//!
//! Each value resolves with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Compiled default (demo values for local use)

use crate::error::{ClientError, Result};

const API_KEY_ENV: &str = "API_KEY";
const API_KEY_DEFAULT: &str = "your_api_key_here";

const BASE_URL_ENV: &str = "BASE_URL";
const BASE_URL_DEFAULT: &str = "http://localhost:8010";

const AGENT_ID_ENV: &str = "AGENT_ID";
const AGENT_ID_DEFAULT: i64 = 123;

/// Fixed configuration for one agent process
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Opaque credential forwarded as `X-API-Key` on every request
    pub api_key: String,
    /// Platform origin, trailing slash stripped
    pub base_url: String,
    /// Identity on whose behalf tasks are requested and completed
    pub agent_id: i64,
}

impl AgentConfig {
    /// Build a validated configuration from explicit values
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        agent_id: i64,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if !is_valid_key(&api_key) {
            return Err(ClientError::Config(
                "API key must be non-empty".to_string(),
            ));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config(
                "Base URL must be non-empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            base_url,
            agent_id,
        })
    }

    /// Resolve configuration following the CLI → ENV → default priority order
    pub fn resolve(
        cli_api_key: Option<String>,
        cli_base_url: Option<String>,
        cli_agent_id: Option<i64>,
    ) -> Result<Self> {
        let api_key = resolve_value(cli_api_key, API_KEY_ENV)
            .unwrap_or_else(|| API_KEY_DEFAULT.to_string());

        let base_url = resolve_value(cli_base_url, BASE_URL_ENV)
            .unwrap_or_else(|| BASE_URL_DEFAULT.to_string());

        let agent_id = match resolve_value(cli_agent_id.map(|id| id.to_string()), AGENT_ID_ENV) {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                ClientError::Config(format!("{} must be an integer, got {:?}", AGENT_ID_ENV, raw))
            })?,
            None => AGENT_ID_DEFAULT,
        };

        Self::new(api_key, base_url, agent_id)
    }
}

fn resolve_value(cli_arg: Option<String>, env_var_name: &str) -> Option<String> {
    // Priority 1: Command-line argument
    if let Some(value) = cli_arg {
        return Some(value);
    }

    // Priority 2: Environment variable
    std::env::var(env_var_name).ok()
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
