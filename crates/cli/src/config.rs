//! Load-profile file support (YAML or TOML)

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rowcast_core::loader::LoaderConfig;
use rowcast_filters::NoiseFilterConfig;

fn default_true() -> bool {
    true
}

/// A loader profile read from a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProfile {
    /// Whether the first line is a header row
    #[serde(default = "default_true")]
    pub has_headers: bool,
    /// Column index holding a byte size, coerced to megabytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_column: Option<usize>,
    /// Noise filter settings
    #[serde(default)]
    pub noise: NoiseFilterConfig,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            has_headers: true,
            size_column: None,
            noise: NoiseFilterConfig::default(),
        }
    }
}

impl LoadProfile {
    /// Load a profile from a file (YAML or TOML, by extension)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            _ => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                extension
            )),
        }
    }

    /// Save a profile to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Profile for the Apple store schema, where column 2 holds the
    /// app size in bytes
    pub fn apple_store() -> Self {
        Self {
            size_column: Some(2),
            ..Default::default()
        }
    }
}

impl From<LoadProfile> for LoaderConfig {
    fn from(profile: LoadProfile) -> Self {
        LoaderConfig {
            has_headers: profile.has_headers,
            size_column: profile.size_column,
            noise: profile.noise,
        }
    }
}
