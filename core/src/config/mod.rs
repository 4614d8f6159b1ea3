use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "skillkit.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub manifest: PathBuf,
    pub descriptor: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(".claude-plugin").join("marketplace.json"),
            descriptor: "package.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub program: String,
    pub args: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec![".claude/skills/skill-creator/scripts/quick_validate.py".to_string()],
            exclude: vec!["node_modules".to_string(), "scripts".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QualityConfig {
    pub threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self { threshold: 8.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub marketplace: MarketplaceConfig,
    pub validation: ValidationConfig,
    pub quality: QualityConfig,
}

impl Config {
    /// Loads `skillkit.toml` from the repository root, or defaults when it is absent.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = get_config_path(root);
        if path.exists() {
            load_config(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.marketplace.manifest)
    }
}

pub fn get_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!("Config file not found: {}", path.display())
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", path.display(), e)
        }
    })?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}
