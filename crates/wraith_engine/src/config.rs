//! # Engine Configuration
//!
//! Read once at start-up from TOML. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! host_version = "1.20.6"
//! tick_rate = 20
//! visibility_radius = 64.0
//! visibility_interval_ticks = 10
//! transport_capacity = 4096
//! log_level = "info"
//! ```

use std::path::Path;

use serde::Deserialize;
use wraith_shared::{WraithError, WraithResult};

/// Highest accepted tick rate.
pub const MAX_TICK_RATE: u32 = 1000;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Version string the host declares. Drives schema negotiation.
    pub host_version: String,
    /// Host ticks per second.
    pub tick_rate: u32,
    /// Base viewer radius in blocks, scaled by each model's view range.
    pub visibility_radius: f64,
    /// Visibility is recomputed every N ticks. `0` disables it.
    pub visibility_interval_ticks: u32,
    /// Bounded transport channel size.
    pub transport_capacity: usize,
    /// Tracing filter directive for binaries.
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host_version: "1.20.6".to_string(),
            tick_rate: 20,
            visibility_radius: 64.0,
            visibility_interval_ticks: 10,
            transport_capacity: 4096,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> WraithResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| WraithError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the file cannot be read or fails validation.
    pub fn from_toml_file(path: impl AsRef<Path>) -> WraithResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| WraithError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> WraithResult<()> {
        if self.tick_rate == 0 || self.tick_rate > MAX_TICK_RATE {
            return Err(WraithError::InvalidConfig(format!(
                "tick_rate must be between 1 and {MAX_TICK_RATE}, but was {}",
                self.tick_rate
            )));
        }
        if !(self.visibility_radius.is_finite() && self.visibility_radius > 0.0) {
            return Err(WraithError::InvalidConfig(format!(
                "visibility_radius must be positive, but was {}",
                self.visibility_radius
            )));
        }
        if self.transport_capacity == 0 {
            return Err(WraithError::InvalidConfig(
                "transport_capacity must be positive".to_string(),
            ));
        }
        if self.host_version.trim().is_empty() {
            return Err(WraithError::InvalidConfig(
                "host_version must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tick_rate, 20);
        assert_eq!(config.host_version, "1.20.6");
    }

    #[test]
    fn test_partial_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            host_version = "1.20.5"
            tick_rate = 40
            visibility_interval_ticks = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.host_version, "1.20.5");
        assert_eq!(config.tick_rate, 40);
        assert_eq!(config.visibility_interval_ticks, 0);
        assert_eq!(config.transport_capacity, 4096);
    }

    #[test]
    fn test_rejects_bad_values() {
        for source in [
            "tick_rate = 0",
            "tick_rate = 5000",
            "visibility_radius = -1.0",
            "transport_capacity = 0",
            "host_version = \"  \"",
        ] {
            assert!(
                matches!(
                    EngineConfig::from_toml_str(source),
                    Err(WraithError::InvalidConfig(_))
                ),
                "{source}"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(EngineConfig::from_toml_str("tick_rate = ").is_err());
        assert!(EngineConfig::from_toml_str("unknown_key = 1").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_toml_file("/nonexistent/wraith.toml").unwrap_err();
        assert!(matches!(err, WraithError::InvalidConfig(_)));
    }
}
