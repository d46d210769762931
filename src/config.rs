//! Engine configuration
//!
//! Everything has a code default matching the tuned policy constants; a
//! YAML file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use action_exec::{TempoPolicy, WaitPolicy};
use feature_perceiver::ExtractPolicy;

use crate::errors::EngineError;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub extract: ExtractPolicy,
    pub tempo: TempoPolicy,
    pub wait: WaitPolicy,
}

impl EngineConfig {
    pub fn from_yaml(input: &str) -> Result<Self, EngineError> {
        serde_yaml::from_str(input).map_err(|err| EngineError::Config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| EngineError::Config(format!("{}: {err}", path.display())))?;
        Self::from_yaml(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_tuned_policies() {
        let config = EngineConfig::default();
        assert_eq!(config.extract.max_links, 60);
        assert_eq!(config.tempo.highlight_ms, 5000);
        assert_eq!(config.wait.default_timeout_ms, 30_000);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let config = EngineConfig::from_yaml("extract:\n  max_links: 10\n").unwrap();
        assert_eq!(config.extract.max_links, 10);
        assert_eq!(config.extract.max_inputs, 75);
        assert_eq!(config.tempo.pointer_reaction_ms, 800);
    }

    #[test]
    fn bad_yaml_is_a_config_error() {
        assert!(EngineConfig::from_yaml(": nope :").is_err());
    }
}
