//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Statistics engine configuration.
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Statistics engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsConfig {
    /// Earliest year a report can be requested for.
    #[serde(default = "default_founding_year")]
    pub founding_year: i32,
    /// How many years past the current calendar year are accepted.
    #[serde(default = "default_max_years_ahead")]
    pub max_years_ahead: i32,
    /// Category keys (payer labels or budget-line codes) rendered in bold.
    #[serde(default)]
    pub emphasized_categories: Vec<String>,
}

fn default_founding_year() -> i32 {
    2015
}

fn default_max_years_ahead() -> i32 {
    1
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            founding_year: default_founding_year(),
            max_years_ahead: default_max_years_ahead(),
            emphasized_categories: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("LEXBUDGET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("statistics.emphasized_categories")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_defaults() {
        let config = StatisticsConfig::default();
        assert_eq!(config.founding_year, 2015);
        assert_eq!(config.max_years_ahead, 1);
        assert!(config.emphasized_categories.is_empty());
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("LEXBUDGET__DATABASE__URL", Some("postgres://localhost/lexbudget")),
                ("LEXBUDGET__SERVER__PORT", Some("9090")),
                ("LEXBUDGET__STATISTICS__FOUNDING_YEAR", Some("2019")),
                (
                    "LEXBUDGET__STATISTICS__EMPHASIZED_CATEGORIES",
                    Some("SGAMI Sud,SGAMI Est"),
                ),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/lexbudget");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.statistics.founding_year, 2019);
                assert_eq!(config.statistics.max_years_ahead, 1);
                assert_eq!(
                    config.statistics.emphasized_categories,
                    vec!["SGAMI Sud".to_string(), "SGAMI Est".to_string()]
                );
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars_unset(["LEXBUDGET__DATABASE__URL"], || {
            assert!(AppConfig::load().is_err());
        });
    }
}
