use serde::Deserialize;

use crate::Result;

/// Configuration for the API server
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// PostgreSQL database URL
    pub database_url: String,
    /// Redis URL
    pub redis_url: String,
    /// Port to run the server on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Host environment name, `test` disables startup seeding
    #[serde(default = "default_app_environment")]
    pub app_environment: String,
    /// Minimum level written by the log subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of plain text
    #[serde(default)]
    pub log_json: bool,
    /// Maximum number of pooled Postgres connections
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: usize,
    /// Global request budget per second
    #[serde(default = "default_rate_limit_per_second")]
    pub rate_limit_per_second: u64,
    /// Burst size allowed per client IP
    #[serde(default = "default_rate_limit_per_ip_burst")]
    pub rate_limit_per_ip_burst: u32,
}

impl Config {
    /// Loads `.env` (if present) and reads the configuration from the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Ok(envy::from_env::<Config>()?)
    }
}

fn default_port() -> u16 {
    3000
}

fn default_app_environment() -> String {
    "development".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_pool_size() -> usize {
    20
}

fn default_rate_limit_per_second() -> u64 {
    1000
}

fn default_rate_limit_per_ip_burst() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply() {
        let config = envy::from_iter::<_, Config>(vars(&[
            ("DATABASE_URL", "postgres://localhost/catalogs"),
            ("REDIS_URL", "redis://localhost"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.app_environment, "development");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.db_pool_size, 20);
        assert_eq!(config.rate_limit_per_second, 1000);
        assert_eq!(config.rate_limit_per_ip_burst, 100);
    }

    #[test]
    fn test_overrides() {
        let config = envy::from_iter::<_, Config>(vars(&[
            ("DATABASE_URL", "postgres://localhost/catalogs"),
            ("REDIS_URL", "redis://localhost"),
            ("PORT", "8080"),
            ("APP_ENVIRONMENT", "test"),
            ("LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.app_environment, "test");
        assert!(config.log_json);
    }

    #[test]
    fn test_missing_database_url_fails() {
        let result = envy::from_iter::<_, Config>(vars(&[("REDIS_URL", "redis://localhost")]));
        assert!(result.is_err());
    }
}
