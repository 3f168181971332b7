//! Runtime configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::limits::{ENTRY_TTL, FIELDS_TTL, QR_CHAR_LIMIT, SEED_ENTRY_LENGTH};

/// Capacity and persistence settings for a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    /// Character budget of the export payload.
    pub qr_char_limit: usize,
    /// Starting largest-entry length used by the remaining-entries estimate.
    pub seed_entry_length: usize,
    /// Lifetime of the stored entry payload.
    #[serde(with = "secs")]
    pub entry_ttl: Duration,
    /// Lifetime of the stored field specifications.
    #[serde(with = "secs")]
    pub fields_ttl: Duration,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            qr_char_limit: QR_CHAR_LIMIT,
            seed_entry_length: SEED_ENTRY_LENGTH,
            entry_ttl: ENTRY_TTL,
            fields_ttl: FIELDS_TTL,
        }
    }
}

impl QuestConfig {
    /// Sets the export character budget.
    pub fn with_qr_char_limit(mut self, limit: usize) -> Self {
        self.qr_char_limit = limit;
        self
    }

    /// Sets the seed for the largest-entry estimate.
    pub fn with_seed_entry_length(mut self, seed: usize) -> Self {
        self.seed_entry_length = seed;
        self
    }

    /// Loads settings from `QUEST_*` environment variables, defaulting any
    /// that are unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            qr_char_limit: try_load(&lookup, "QUEST_QR_CHAR_LIMIT", defaults.qr_char_limit)?,
            seed_entry_length: try_load(
                &lookup,
                "QUEST_SEED_ENTRY_LENGTH",
                defaults.seed_entry_length,
            )?,
            entry_ttl: Duration::from_secs(try_load(
                &lookup,
                "QUEST_ENTRY_TTL_SECS",
                defaults.entry_ttl.as_secs(),
            )?),
            fields_ttl: Duration::from_secs(try_load(
                &lookup,
                "QUEST_FIELDS_TTL_SECS",
                defaults.fields_ttl.as_secs(),
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses settings from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make the estimate meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qr_char_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "qr_char_limit",
                value: "0".to_string(),
            });
        }
        if self.seed_entry_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "seed_entry_length",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn try_load<T: FromStr + std::fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw,
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuestConfig::default();
        assert_eq!(config.qr_char_limit, 2800);
        assert_eq!(config.seed_entry_length, 50);
        assert_eq!(config.entry_ttl, Duration::from_secs(86_400));
        assert_eq!(config.fields_ttl, Duration::from_secs(43_200));
    }

    #[test]
    fn test_from_lookup() {
        let config = QuestConfig::from_lookup(|key| match key {
            "QUEST_QR_CHAR_LIMIT" => Some("1200".to_string()),
            "QUEST_ENTRY_TTL_SECS" => Some(" 60 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.qr_char_limit, 1200);
        assert_eq!(config.seed_entry_length, 50);
        assert_eq!(config.entry_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_from_lookup_invalid() {
        let result = QuestConfig::from_lookup(|key| {
            (key == "QUEST_QR_CHAR_LIMIT").then(|| "lots".to_string())
        });
        assert_eq!(
            result,
            Err(ConfigError::InvalidValue {
                key: "QUEST_QR_CHAR_LIMIT",
                value: "lots".to_string(),
            })
        );

        let result = QuestConfig::from_lookup(|key| {
            (key == "QUEST_SEED_ENTRY_LENGTH").then(|| "0".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { key: "seed_entry_length", .. })));
    }

    #[test]
    fn test_from_json() {
        let config = QuestConfig::from_json(r#"{"qr_char_limit": 10, "fields_ttl": 5}"#).unwrap();
        assert_eq!(config.qr_char_limit, 10);
        assert_eq!(config.fields_ttl, Duration::from_secs(5));
        assert_eq!(config.seed_entry_length, 50);

        assert!(matches!(QuestConfig::from_json("{"), Err(ConfigError::Json(_))));
    }
}
