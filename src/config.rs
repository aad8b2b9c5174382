use crate::exceptions::StintError;
use regex::Regex;
use std::env;

pub const DEFAULT_ESTIMATE_FIELD: &str = "customfield_10016";

/// Connection settings for the Jira instance. Assembled once from the
/// environment; everything downstream receives it explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    /// Custom field carrying the story-point estimate.
    pub estimate_field: String,
}

impl Config {
    pub fn from_env() -> Result<Self, StintError> {
        let base_url = require_env("JIRA_BASE_URL")?;
        let email = require_env("JIRA_EMAIL")?;
        let api_token = require_env("JIRA_API_TOKEN")?;
        let estimate_field =
            env::var("JIRA_ESTIMATE_FIELD").unwrap_or_else(|_| DEFAULT_ESTIMATE_FIELD.to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            api_token,
            estimate_field,
        })
    }
}

fn require_env(name: &str) -> Result<String, StintError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(StintError::Configuration(format!("{} is required.", name))),
    }
}

/// Compiles the sprint name selector. A pattern that does not compile is a
/// fatal configuration error, reported before any fetch begins.
pub fn parse_sprint_pattern(raw: &str) -> Result<Regex, StintError> {
    Regex::new(raw).map_err(|e| {
        StintError::Configuration(format!("invalid sprint pattern '{}': {}", raw, e))
    })
}
