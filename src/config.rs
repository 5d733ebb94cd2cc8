use serde::Deserialize;
use std::time::Duration;

use crate::{
    routes::{
        DEFAULT_EXPLAIN_TIMEOUT, DEFAULT_MAX_BUDGET, DEFAULT_MIN_BUDGET, DEFAULT_RECOMMEND_TIMEOUT,
    },
    services::recommender::DEFAULT_CANDIDATE_LIMIT,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database holding one table per part type
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    /// Redis connection URL; explanation caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// OpenAI API key; explanations fall back to a local template when unset
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of candidates kept per part type
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,

    /// Smallest budget accepted by the build endpoint
    #[serde(default = "default_min_budget")]
    pub min_budget: f64,

    /// Largest budget accepted by the build endpoint
    #[serde(default = "default_max_budget")]
    pub max_budget: f64,

    /// Deadline for a single recommendation, in milliseconds
    #[serde(default = "default_recommend_timeout_ms")]
    pub recommend_timeout_ms: u64,

    /// Deadline for generating an explanation, in milliseconds
    #[serde(default = "default_explain_timeout_ms")]
    pub explain_timeout_ms: u64,

    /// Optional JSON file overriding the allocation, weight and minimum spend tables
    #[serde(default)]
    pub profile_tables_path: Option<String>,
}

fn default_database_url() -> String {
    "sqlite://data/parts.db".to_string()
}

fn default_database_max_connections() -> u32 {
    5
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_candidate_limit() -> usize {
    DEFAULT_CANDIDATE_LIMIT
}

fn default_min_budget() -> f64 {
    DEFAULT_MIN_BUDGET
}

fn default_max_budget() -> f64 {
    DEFAULT_MAX_BUDGET
}

fn default_recommend_timeout_ms() -> u64 {
    DEFAULT_RECOMMEND_TIMEOUT.as_millis() as u64
}

fn default_explain_timeout_ms() -> u64 {
    DEFAULT_EXPLAIN_TIMEOUT.as_millis() as u64
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.candidate_limit == 0 {
            anyhow::bail!("CANDIDATE_LIMIT must be at least 1");
        }
        if !(self.min_budget.is_finite() && self.max_budget.is_finite())
            || self.min_budget <= 0.0
            || self.min_budget > self.max_budget
        {
            anyhow::bail!(
                "Invalid budget bounds: MIN_BUDGET={} MAX_BUDGET={}",
                self.min_budget,
                self.max_budget
            );
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn recommend_timeout(&self) -> Duration {
        Duration::from_millis(self.recommend_timeout_ms)
    }

    pub fn explain_timeout(&self) -> Duration {
        Duration::from_millis(self.explain_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: Vec<(&str, &str)>) -> Config {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(vec![]);
        assert_eq!(config.database_url, "sqlite://data/parts.db");
        assert_eq!(config.candidate_limit, 5);
        assert_eq!(config.min_budget, 800.0);
        assert_eq!(config.max_budget, 10_000.0);
        assert_eq!(config.recommend_timeout(), Duration::from_secs(5));
        assert_eq!(config.explain_timeout(), Duration::from_secs(10));
        assert_eq!(config.redis_url, None);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(vec![
            ("CANDIDATE_LIMIT", "3"),
            ("PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379"),
            ("EXPLAIN_TIMEOUT_MS", "2500"),
        ]);
        assert_eq!(config.explain_timeout(), Duration::from_millis(2500));
        assert_eq!(config.candidate_limit, 3);
        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
    }

    #[test]
    fn test_validate_rejects_inverted_budget_bounds() {
        let config = config_from(vec![("MIN_BUDGET", "2000"), ("MAX_BUDGET", "1000")]);
        assert!(config.validate().is_err());

        let config = config_from(vec![("CANDIDATE_LIMIT", "0")]);
        assert!(config.validate().is_err());
    }
}
