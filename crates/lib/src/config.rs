//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (default `~/.chatgql/config.json`) and environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::conversion::InboundOptions;

/// Top-level config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Conversion behavior.
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// How converted documents are printed.
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionConfig {
    /// Repair truncated action arguments on inbound conversion (default true).
    #[serde(default = "default_repair_arguments")]
    pub repair_arguments: bool,
}

fn default_repair_arguments() -> bool {
    true
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            repair_arguments: default_repair_arguments(),
        }
    }
}

impl From<&ConversionConfig> for InboundOptions {
    fn from(c: &ConversionConfig) -> Self {
        InboundOptions {
            repair_arguments: c.repair_arguments,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Pretty-print JSON output. Overridden by CHATGQL_PRETTY env.
    #[serde(default)]
    pub pretty: bool,
}

/// Resolve pretty printing: env CHATGQL_PRETTY overrides config.
pub fn resolve_pretty_output(config: &Config) -> bool {
    std::env::var("CHATGQL_PRETTY")
        .ok()
        .and_then(|s| parse_flag(&s))
        .unwrap_or(config.output.pretty)
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("CHATGQL_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".chatgql").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path, or the default path (or CHATGQL_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_repair_and_compact_output() {
        let c = Config::default();
        assert!(c.conversion.repair_arguments);
        assert!(!c.output.pretty);
        assert!(InboundOptions::from(&c.conversion).repair_arguments);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c: Config = serde_json::from_str(r#"{ "output": { "pretty": true } }"#).unwrap();
        assert!(c.output.pretty);
        assert!(c.conversion.repair_arguments);

        let c: Config =
            serde_json::from_str(r#"{ "conversion": { "repairArguments": false } }"#).unwrap();
        assert!(!c.conversion.repair_arguments);
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let path = std::env::temp_dir()
            .join(format!("chatgql-missing-{}", uuid::Uuid::new_v4()))
            .join("config.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert!(config.conversion.repair_arguments);
    }

    #[test]
    fn parse_flag_values() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
