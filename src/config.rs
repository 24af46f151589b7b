use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TroveConfig {
    pub parser: ParserRules,
    pub summary: SummaryRules,
    pub matcher: MatcherRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserRules {
    /// Line prefix starting a device-to-manager message block.
    pub inbound_marker: String,
    /// Line prefix starting a manager-to-device message block.
    pub outbound_marker: String,
    pub timestamp_separator: String,
}

impl Default for ParserRules {
    fn default() -> Self {
        Self {
            inbound_marker: "<<<<in".to_string(),
            outbound_marker: ">>>>out".to_string(),
            timestamp_separator: "::".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryRules {
    /// How many leading body lines are inspected for type classification.
    pub scan_limit: usize,
    /// Maximum length of a recorded operation type before truncation.
    pub type_max_len: usize,
    /// Whether messages with no classifiable operation type are kept.
    pub keep_typeless: bool,
}

impl Default for SummaryRules {
    fn default() -> Self {
        Self {
            scan_limit: 10,
            type_max_len: 48,
            keep_typeless: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherRules {
    /// Deepest start position tried for free-floating path expressions.
    pub max_float_depth: usize,
}

impl Default for MatcherRules {
    fn default() -> Self {
        Self {
            max_float_depth: 100,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<TroveConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<TroveConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<TroveConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static TroveConfig {
    static DEFAULT_CONFIG: LazyLock<TroveConfig> = LazyLock::new(TroveConfig::default);
    &DEFAULT_CONFIG
}
