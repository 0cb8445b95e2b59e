//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `USE_PERSISTENT_STORES` | `false` | read prices from Postgres instead of memory |
//! | `DATABASE_URL` | unset | required when `USE_PERSISTENT_STORES=true` |
//! | `PRICING_SEED_FILE` | unset | JSON seed for the in-memory store |
//! | `REDIS_URL` | unset | shared result cache (needs the `redis` feature) |
//! | `PRICE_CACHE_TTL_SECS` | `300` | TTL of Redis cache entries |
//! | `PRICING_POLICY` | `lenient` | `lenient` or `strict` (reject mixed-currency groups) |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use pricing_prices::ResolutionPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Where price records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    InMemory { seed_file: Option<PathBuf> },
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub records: RecordSource,
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub policy: ResolutionPolicy,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(v) => v.trim().parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: v.clone(),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let persistent = match get("USE_PERSISTENT_STORES") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "USE_PERSISTENT_STORES",
                value: v,
            })?,
            None => false,
        };

        let records = if persistent {
            RecordSource::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            }
        } else {
            RecordSource::InMemory {
                seed_file: get("PRICING_SEED_FILE").map(PathBuf::from),
            }
        };

        let cache_ttl = match get("PRICE_CACHE_TTL_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "PRICE_CACHE_TTL_SECS",
                    value: v.clone(),
                })?,
            None => Duration::from_secs(300),
        };

        let policy = match get("PRICING_POLICY") {
            Some(v) => match v.trim().to_lowercase().as_str() {
                "lenient" => ResolutionPolicy::Lenient,
                "strict" => ResolutionPolicy::Strict,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "PRICING_POLICY",
                        value: v,
                    });
                }
            },
            None => ResolutionPolicy::Lenient,
        };

        Ok(Self {
            bind_addr,
            records,
            redis_url: get("REDIS_URL"),
            cache_ttl,
            policy,
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            records: RecordSource::InMemory { seed_file: None },
            redis_url: None,
            cache_ttl: Duration::from_secs(300),
            policy: ResolutionPolicy::Lenient,
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(config(&[]).unwrap(), ServiceConfig::default());
    }

    #[test]
    fn persistent_stores_require_database_url() {
        let err = config(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn persistent_stores_use_postgres() {
        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/pricing"),
        ])
        .unwrap();
        assert_eq!(
            cfg.records,
            RecordSource::Postgres {
                database_url: "postgres://localhost/pricing".to_string()
            }
        );
    }

    #[test]
    fn policy_and_ttl_are_parsed() {
        let cfg = config(&[("PRICING_POLICY", "Strict"), ("PRICE_CACHE_TTL_SECS", "60")]).unwrap();
        assert_eq!(cfg.policy, ResolutionPolicy::Strict);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config(&[("BIND_ADDR", "not-an-addr")]),
            Err(ConfigError::Invalid { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("PRICING_POLICY", "majority")]),
            Err(ConfigError::Invalid { key: "PRICING_POLICY", .. })
        ));
        assert!(matches!(
            config(&[("USE_PERSISTENT_STORES", "maybe")]),
            Err(ConfigError::Invalid { key: "USE_PERSISTENT_STORES", .. })
        ));
    }

    #[test]
    fn seed_file_is_picked_up_for_in_memory_store() {
        let cfg = config(&[("PRICING_SEED_FILE", "/etc/pricing/seed.json")]).unwrap();
        assert_eq!(
            cfg.records,
            RecordSource::InMemory {
                seed_file: Some(PathBuf::from("/etc/pricing/seed.json"))
            }
        );
    }
}
