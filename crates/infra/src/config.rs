//! Configuration loading and representation.
//!
//! Everything comes from `PRODMGR_*` environment variables with defaults, so
//! the shop runs with no setup at all.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const ENV_LOCALE: &str = "PRODMGR_LOCALE";
pub const ENV_DATA_DIR: &str = "PRODMGR_DATA_DIR";
pub const ENV_REPORT_DIR: &str = "PRODMGR_REPORT_DIR";
pub const ENV_WORKERS: &str = "PRODMGR_WORKERS";
pub const ENV_REVIEWS_PER_WORKER: &str = "PRODMGR_REVIEWS_PER_WORKER";
pub const ENV_SEED: &str = "PRODMGR_SEED";
pub const ENV_LOG_FORMAT: &str = "PRODMGR_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Log output format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Locale tag used to pick a formatter (e.g. `en-US`).
    pub locale: String,
    /// Folder holding `product{id}.json` / `reviews{id}.jsonl`.
    pub data_folder: PathBuf,
    /// Folder receiving `product{id}.txt` reports.
    pub report_folder: PathBuf,
    /// Simulator pool size.
    pub workers: usize,
    pub reviews_per_worker: usize,
    /// Base seed for the simulator's per-worker RNGs.
    pub seed: u64,
    pub log_format: LogFormat,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            data_folder: PathBuf::from("data"),
            report_folder: PathBuf::from("reports"),
            workers: 4,
            reviews_per_worker: 5,
            seed: 42,
            log_format: LogFormat::Json,
        }
    }
}

impl CatalogConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let locale = lookup(ENV_LOCALE).unwrap_or_else(|| {
            tracing::warn!("{ENV_LOCALE} not set; using {}", defaults.locale);
            defaults.locale.clone()
        });

        let data_folder = lookup(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_folder);
        let report_folder = lookup(ENV_REPORT_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.report_folder);

        let workers = parse(&lookup, ENV_WORKERS, "a positive integer", defaults.workers)?;
        if workers == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_WORKERS,
                expected: "a positive integer",
                value: "0".to_string(),
            });
        }
        let reviews_per_worker = parse(
            &lookup,
            ENV_REVIEWS_PER_WORKER,
            "a non-negative integer",
            defaults.reviews_per_worker,
        )?;
        let seed = parse(&lookup, ENV_SEED, "an unsigned integer", defaults.seed)?;
        let log_format = parse(&lookup, ENV_LOG_FORMAT, "json or pretty", defaults.log_format)?;

        Ok(Self {
            locale,
            data_folder,
            report_folder,
            workers,
            reviews_per_worker,
            seed,
            log_format,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (ENV_LOCALE, "zh-CN"),
            (ENV_DATA_DIR, "/tmp/data"),
            (ENV_REPORT_DIR, "/tmp/reports"),
            (ENV_WORKERS, "20"),
            (ENV_REVIEWS_PER_WORKER, "3"),
            (ENV_SEED, "7"),
            (ENV_LOG_FORMAT, "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.data_folder, PathBuf::from("/tmp/data"));
        assert_eq!(config.report_folder, PathBuf::from("/tmp/reports"));
        assert_eq!(config.workers, 20);
        assert_eq!(config.reviews_per_worker, 3);
        assert_eq!(config.seed, 7);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = CatalogConfig::from_lookup(lookup(&[(ENV_WORKERS, "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: ENV_WORKERS,
                expected: "a positive integer",
                value: "many".to_string(),
            }
        );
    }

    #[test]
    fn rejects_empty_pool() {
        assert!(CatalogConfig::from_lookup(lookup(&[(ENV_WORKERS, "0")])).is_err());
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(CatalogConfig::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).is_err());
    }
}
