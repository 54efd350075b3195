//! cuboid.toml export configuration
//!
//! Every field is optional; an empty file (or no file) gives the defaults.
//!
//! ```toml
//! weight_threshold = 0.5
//! hide_bottom = true
//!
//! [pack]
//! margin = 0.0
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::partition::DEFAULT_WEIGHT_THRESHOLD;

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// A vertex belongs to a bone when its weight in the bone's group is
    /// strictly greater than this.
    /// Default: 0.5
    #[serde(default = "default_weight_threshold")]
    pub weight_threshold: f64,

    /// Keep bottom faces out of the packing pass and rebuild them next to
    /// the packed top face afterwards.
    /// Default: true
    #[serde(default = "default_hide_bottom")]
    pub hide_bottom: bool,

    #[serde(default)]
    pub pack: PackSection,
}

/// Settings for the bundled shelf packer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackSection {
    /// Gap between islands, in unscaled UV units.
    /// Default: 0.0
    #[serde(default)]
    pub margin: f64,
}

fn default_weight_threshold() -> f64 {
    DEFAULT_WEIGHT_THRESHOLD
}

fn default_hide_bottom() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            weight_threshold: default_weight_threshold(),
            hide_bottom: default_hide_bottom(),
            pack: PackSection::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse configuration from string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse cuboid.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.weight_threshold) {
            bail!(
                "weight_threshold must be in [0, 1), got {}",
                self.weight_threshold
            );
        }
        if !self.pack.margin.is_finite() || self.pack.margin < 0.0 {
            bail!(
                "pack.margin must be a non-negative number, got {}",
                self.pack.margin
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ExportConfig::parse("").unwrap();
        assert_eq!(config.weight_threshold, 0.5);
        assert!(config.hide_bottom);
        assert_eq!(config.pack.margin, 0.0);
    }

    #[test]
    fn test_full_config() {
        let config = ExportConfig::parse(
            r#"
weight_threshold = 0.25
hide_bottom = false

[pack]
margin = 0.125
"#,
        )
        .unwrap();
        assert_eq!(config.weight_threshold, 0.25);
        assert!(!config.hide_bottom);
        assert_eq!(config.pack.margin, 0.125);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(ExportConfig::parse("weight_threshold = 1.0").is_err());
        assert!(ExportConfig::parse("weight_threshold = -0.1").is_err());
        assert!(ExportConfig::parse("[pack]\nmargin = -1.0").is_err());
    }

    #[test]
    fn test_rejects_wrong_type() {
        assert!(ExportConfig::parse("hide_bottom = \"yes\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuboid.toml");
        std::fs::write(&path, "hide_bottom = false\n").unwrap();

        let config = ExportConfig::load_or_default(Some(&path)).unwrap();
        assert!(!config.hide_bottom);
        assert!(ExportConfig::load_or_default(None).unwrap().hide_bottom);
        assert!(ExportConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
