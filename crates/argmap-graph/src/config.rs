//! Argument map configuration
//!
//! Creation defaults, connection policy, seeding and edge palette. Loaded
//! from TOML at startup, falls back to defaults if no config file exists.

use crate::admission::SelfLoopPolicy;
use argmap_core::{Error, Palette, Position, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level map configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Field values given to a freshly created claim.
    pub defaults: NodeDefaults,
    /// Rules for drag-connect.
    pub connections: ConnectionConfig,
    /// Initial graph contents.
    pub seed: SeedConfig,
    /// Edge colors and stroke.
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    pub text: String,
    pub author: String,
    /// Belief in [0, 1].
    pub belief: f64,
    /// Where new claims are placed; users drag them afterwards.
    pub spawn_position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub self_loops: SelfLoopPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Start with the two-claim climate example instead of an empty map.
    pub example_graph: bool,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            text: "New Claim".into(),
            author: "User".into(),
            belief: 0.5,
            spawn_position: Position::new(100.0, 100.0),
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl MapConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Strict variant of [`MapConfig::load`]: a missing or malformed file is an error.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let belief = self.defaults.belief;
        if !(0.0..=1.0).contains(&belief) {
            return Err(Error::ConfigError(format!(
                "defaults.belief must be within [0, 1], got {}",
                belief
            )));
        }
        Ok(())
    }
}
