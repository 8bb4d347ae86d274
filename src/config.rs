use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::orders::status::TransitionPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataSourceKind {
    /// Relational store, with the in-memory dataset as fallback.
    #[default]
    Database,
    /// In-memory dataset only.
    Memory,
}

impl FromStr for DataSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "memory" | "mock" => Ok(Self::Memory),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub data_source: DataSourceKind,
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub order_status_policy: TransitionPolicy,
    pub seed_database: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceKind::Memory,
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            order_status_policy: TransitionPolicy::default(),
            seed_database: false,
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let data_source = parse_var(get("DATA_SOURCE"), "DATA_SOURCE")?.unwrap_or_default();
        let database_url = get("DATABASE_URL").map(str::to_string);
        if data_source == DataSourceKind::Database && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            data_source,
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR).to_string(),
            order_status_policy: parse_var(get("ORDER_STATUS_POLICY"), "ORDER_STATUS_POLICY")?
                .unwrap_or_default(),
            seed_database: match get("SEED_DATABASE") {
                None => false,
                Some(value) => parse_bool(value).ok_or_else(|| ConfigError::Invalid {
                    key: "SEED_DATABASE",
                    value: value.to_string(),
                })?,
            },
        })
    }
}

fn parse_var<T: FromStr>(value: Option<&str>, key: &'static str) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value.parse::<T>().map_err(|_| ConfigError::Invalid {
                key,
                value: value.to_string(),
            })
        })
        .transpose()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn database_source_needs_a_url() {
        assert_eq!(
            AppConfig::from_vars(vars(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );

        let config = AppConfig::from_vars(vars(&[("DATABASE_URL", "sqlite::memory:")]))
            .expect("valid config");
        assert_eq!(config.data_source, DataSourceKind::Database);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.order_status_policy, TransitionPolicy::Permissive);
        assert!(!config.seed_database);
    }

    #[test]
    fn memory_source_and_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("DATA_SOURCE", "memory"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("ORDER_STATUS_POLICY", "strict"),
            ("SEED_DATABASE", "yes"),
        ]))
        .expect("valid config");
        assert_eq!(config.data_source, DataSourceKind::Memory);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.order_status_policy, TransitionPolicy::Strict);
        assert!(config.seed_database);
    }

    #[test]
    fn bad_values_are_reported() {
        assert_eq!(
            AppConfig::from_vars(vars(&[("DATA_SOURCE", "redis")])),
            Err(ConfigError::Invalid {
                key: "DATA_SOURCE",
                value: "redis".to_string()
            })
        );
        assert!(AppConfig::from_vars(vars(&[
            ("DATA_SOURCE", "memory"),
            ("SEED_DATABASE", "sometimes")
        ]))
        .is_err());
    }
}
