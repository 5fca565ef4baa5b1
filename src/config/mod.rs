mod test;

use crate::access::JoinPolicy;
use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Knobs the room service itself depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub join_policy: JoinPolicy,
    /// How many times a mutation is recomputed after losing a concurrent write.
    pub commit_retries: u32,
    /// Capacity of each live viewer's outbound queue.
    pub viewer_buffer: usize,
    /// Leave the acting player out of the fan-out for their own change.
    pub skip_actor_echo: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            join_policy: JoinPolicy::OrganizerOnly,
            commit_retries: 8,
            viewer_buffer: 64,
            skip_actor_echo: false,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub service: ServiceConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ServiceConfig::default();

        let join_policy = match lookup("POKER_JOIN_POLICY") {
            Some(value) => value
                .parse::<JoinPolicy>()
                .map_err(|e| anyhow!(e))
                .context("POKER_JOIN_POLICY must be 'organizer-only' or 'everyone'")?,
            None => defaults.join_policy,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            service: ServiceConfig {
                join_policy,
                commit_retries: match lookup("POKER_COMMIT_RETRIES") {
                    Some(value) => value
                        .parse()
                        .context("POKER_COMMIT_RETRIES must be a valid number")?,
                    None => defaults.commit_retries,
                },
                viewer_buffer: match lookup("POKER_VIEWER_BUFFER") {
                    Some(value) => value
                        .parse()
                        .context("POKER_VIEWER_BUFFER must be a valid number")?,
                    None => defaults.viewer_buffer,
                },
                skip_actor_echo: match lookup("POKER_SKIP_ACTOR_ECHO") {
                    Some(value) => value
                        .parse()
                        .context("POKER_SKIP_ACTOR_ECHO must be 'true' or 'false'")?,
                    None => defaults.skip_actor_echo,
                },
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
