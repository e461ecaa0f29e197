use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::debug;

use crate::conversation::{CompletionParams, DEFAULT_MAX_SESSIONS};
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3030";

/// Process-wide settings, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub params: CompletionParams,
    pub history_limit: Option<usize>,
    pub kickoff: bool,
    pub max_sessions: usize,
    pub listen_addr: SocketAddr,
    pub reachable_addr: String,
}

impl Config {
    /// Reads the environment, after merging a `.env` file if one is found.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("GROQ_API_KEY").ok_or_else(|| {
            Error::Configuration(
                "GROQ_API_KEY is not set; add it to the environment or to a .env file".into(),
            )
        })?;
        if api_key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::Configuration(
                "GROQ_API_KEY contains whitespace".into(),
            ));
        }

        let mut params = CompletionParams::default();
        if let Some(model) = get("SCRUMBOT_MODEL") {
            params.model = model;
        }

        let history_limit = match get("SCRUMBOT_HISTORY_LIMIT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(Error::Configuration(format!(
                        "SCRUMBOT_HISTORY_LIMIT must be a positive integer, got `{raw}`"
                    )))
                }
                Ok(limit) => Some(limit),
            },
            None => None,
        };

        let kickoff = match get("SCRUMBOT_KICKOFF").as_deref() {
            None => false,
            Some(flag) => parse_flag(flag).ok_or_else(|| {
                Error::Configuration(format!("SCRUMBOT_KICKOFF is not a boolean: `{flag}`"))
            })?,
        };

        let max_sessions = match get("SCRUMBOT_MAX_SESSIONS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(Error::Configuration(format!(
                        "SCRUMBOT_MAX_SESSIONS must be a positive integer, got `{raw}`"
                    )))
                }
                Ok(max) => max,
            },
            None => DEFAULT_MAX_SESSIONS,
        };

        let listen_raw = get("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_raw.parse().map_err(|_| {
            Error::Configuration(format!("LISTEN_ADDR is not a socket address: `{listen_raw}`"))
        })?;
        let reachable_addr = get("REACHABLE_ADDR").unwrap_or_else(|| listen_addr.to_string());

        let config = Config {
            api_key,
            api_base: get("SCRUMBOT_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            params,
            history_limit,
            kickoff,
            max_sessions,
            listen_addr,
            reachable_addr,
        };
        debug!(
            api_base = %config.api_base,
            model = %config.params.model,
            history_limit = ?config.history_limit,
            "configuration loaded"
        );
        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
