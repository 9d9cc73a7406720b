//! Engine tunables, loadable from TOML.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every constant the engine uses. Missing TOML keys take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clustering only kicks in above this many visible orders.
    pub cluster_threshold: usize,
    /// Relative price resolution of a cluster bucket (0.001 = 0.1%).
    pub cluster_price_tolerance: f64,
    /// Width of a cluster time bucket.
    pub cluster_time_bucket_secs: i64,
    /// Relative price resolution of a ladder level (0.0001 = 0.01%).
    pub ladder_price_tolerance: f64,
    /// Maximum price levels per ladder band.
    pub ladder_band_size: usize,
    /// Padding applied to each side of an instrument's time window.
    pub window_padding_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster_threshold: 500,
            cluster_price_tolerance: 0.001,
            cluster_time_bucket_secs: 300,
            ladder_price_tolerance: 0.0001,
            ladder_band_size: 5,
            window_padding_secs: 2 * 60 * 60,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cluster_price_tolerance.is_finite() && self.cluster_price_tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cluster_price_tolerance must be positive, got {}",
                self.cluster_price_tolerance
            )));
        }
        if !(self.ladder_price_tolerance.is_finite() && self.ladder_price_tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ladder_price_tolerance must be positive, got {}",
                self.ladder_price_tolerance
            )));
        }
        if self.cluster_time_bucket_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "cluster_time_bucket_secs must be positive, got {}",
                self.cluster_time_bucket_secs
            )));
        }
        if self.ladder_band_size == 0 {
            return Err(ConfigError::Invalid("ladder_band_size must be at least 1".into()));
        }
        if self.window_padding_secs < 0 {
            return Err(ConfigError::Invalid(format!(
                "window_padding_secs must not be negative, got {}",
                self.window_padding_secs
            )));
        }
        if Duration::try_seconds(self.window_padding_secs).is_none() {
            return Err(ConfigError::Invalid(format!(
                "window_padding_secs is out of range, got {}",
                self.window_padding_secs
            )));
        }
        Ok(())
    }

    /// Window padding as a duration. An out-of-range value, which `validate`
    /// rejects, saturates instead of panicking.
    pub fn window_padding(&self) -> Duration {
        Duration::try_seconds(self.window_padding_secs).unwrap_or_else(Duration::max_value)
    }

    /// BLAKE3 digest of the canonical JSON form. Two configs with the same
    /// fingerprint produce identical engine output for the same input.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::json!({
            "cluster_threshold": self.cluster_threshold,
            "cluster_price_tolerance": self.cluster_price_tolerance,
            "cluster_time_bucket_secs": self.cluster_time_bucket_secs,
            "ladder_price_tolerance": self.ladder_price_tolerance,
            "ladder_band_size": self.ladder_band_size,
            "window_padding_secs": self.window_padding_secs,
        });
        blake3::hash(json.to_string().as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let c = EngineConfig::default();
        assert_eq!(c.cluster_threshold, 500);
        assert_eq!(c.cluster_price_tolerance, 0.001);
        assert_eq!(c.cluster_time_bucket_secs, 300);
        assert_eq!(c.ladder_price_tolerance, 0.0001);
        assert_eq!(c.ladder_band_size, 5);
        assert_eq!(c.window_padding(), Duration::hours(2));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c = EngineConfig::from_toml("cluster_threshold = 50\nladder_band_size = 3\n").unwrap();
        assert_eq!(c.cluster_threshold, 50);
        assert_eq!(c.ladder_band_size, 3);
        assert_eq!(c.cluster_time_bucket_secs, 300);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn rejects_zero_band_size() {
        let err = EngineConfig::from_toml("ladder_band_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        assert!(EngineConfig::from_toml("cluster_price_tolerance = 0.0").is_err());
        assert!(EngineConfig::from_toml("ladder_price_tolerance = -0.1").is_err());
    }

    #[test]
    fn rejects_out_of_range_padding() {
        let err = EngineConfig::from_toml("window_padding_secs = 9223372036854775807").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(EngineConfig::from_toml("window_padding_secs = -1").is_err());

        let unchecked = EngineConfig { window_padding_secs: i64::MAX, ..EngineConfig::default() };
        assert_eq!(unchecked.window_padding(), Duration::max_value());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml("cluster_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = EngineConfig { cluster_threshold: 42, ..EngineConfig::default() };
        let text = c.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn fingerprint_tracks_values() {
        let a = EngineConfig::default();
        let b = EngineConfig::default();
        let c = EngineConfig { window_padding_secs: 60, ..EngineConfig::default() };
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
