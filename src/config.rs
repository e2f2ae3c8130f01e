//! Engine configuration.

use serde::{Deserialize, Serialize};
use uigraft_host_adapter::Selector;
use uigraft_injector::GateConfig;

use crate::errors::GraftError;

/// Tuning for one graft context. Selectors are host-specific and expected
/// to be overridden by every embedder; the rest has serviceable defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraftConfig {
    /// Root anchor the readiness gate waits for before any injection.
    pub root_selector: String,

    /// Query identifying the currently active target region.
    pub region_selector: String,

    pub gate: GateConfig,

    /// Capacity for the engine's broadcast channels.
    pub channel_capacity: usize,
}

impl Default for GraftConfig {
    fn default() -> Self {
        Self {
            root_selector: "#app".to_string(),
            region_selector: ".region.active".to_string(),
            gate: GateConfig::default(),
            channel_capacity: 64,
        }
    }
}

impl GraftConfig {
    /// Check the configuration before the engine starts: both selectors
    /// must parse and the numeric knobs must be nonzero.
    pub fn validate(&self) -> Result<(), GraftError> {
        Selector::parse(&self.root_selector)
            .map_err(|err| GraftError::Config(format!("root_selector: {err}")))?;
        Selector::parse(&self.region_selector)
            .map_err(|err| GraftError::Config(format!("region_selector: {err}")))?;
        if self.channel_capacity == 0 {
            return Err(GraftError::Config("channel_capacity must be nonzero".into()));
        }
        if self.gate.max_attempts == 0 {
            return Err(GraftError::Config("gate.max_attempts must be nonzero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GraftConfig::default().validate().unwrap();
    }

    #[test]
    fn bad_selector_is_a_config_error() {
        let config = GraftConfig {
            region_selector: "> .oops".to_string(),
            ..GraftConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GraftError::Config(_)));
    }

    #[test]
    fn deserializes_with_partial_overrides() {
        let config: GraftConfig = serde_json::from_str(
            r##"{ "root_selector": "#browser", "gate": { "max_attempts": 3 } }"##,
        )
        .unwrap();
        assert_eq!(config.root_selector, "#browser");
        assert_eq!(config.gate.max_attempts, 3);
        assert_eq!(config.channel_capacity, 64);
    }
}
