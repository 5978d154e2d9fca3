use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::retry::RetryConfig;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    pub google_api_key: Option<String>,
    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,
    #[serde(default = "default_google_story_model")]
    pub google_story_model: String,
    #[serde(default = "default_google_metadata_model")]
    pub google_metadata_model: String,

    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_openai_story_model")]
    pub openai_story_model: String,
    #[serde(default = "default_openai_metadata_model")]
    pub openai_metadata_model: String,

    #[serde(default = "default_llm_timeout_seconds")]
    pub llm_timeout_seconds: u64,

    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: u64,

    #[serde(default = "default_seed_templates")]
    pub seed_templates: bool,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Builds the configuration from explicit key/value pairs instead of the
    /// process environment. Keys use the upper-case environment spelling.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_retry_attempts,
            initial_delay_ms: self.initial_retry_delay_ms,
            max_delay_ms: self.max_retry_delay_ms,
            backoff_multiplier: self.retry_backoff_multiplier,
        }
    }
}

fn default_server_port() -> u16 {
    3000
}

fn default_google_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_google_story_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_google_metadata_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_story_model() -> String {
    "gpt-5-nano".to_string()
}

fn default_openai_metadata_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_seconds() -> u64 {
    120
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_initial_retry_delay_ms() -> u64 {
    500
}

fn default_max_retry_delay_ms() -> u64 {
    5000
}

fn default_retry_backoff_multiplier() -> u64 {
    2
}

fn default_seed_templates() -> bool {
    true
}
