use crate::analysis::ViolationRules;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON record per session
    pub store_dir: PathBuf,
    /// Where session thumbnails are written; `None` disables them
    pub thumbnail_dir: Option<PathBuf>,
    /// Thresholds of the technique rules
    pub rules: ViolationRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("sessions"),
            thumbnail_dir: None,
            rules: ViolationRules::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            store_dir = "/var/lib/walks"

            [rules]
            trunk_tilt_warning = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.store_dir, PathBuf::from("/var/lib/walks"));
        assert_eq!(config.thumbnail_dir, None);
        assert_eq!(config.rules.trunk_tilt_warning, 20.0);
        assert_eq!(config.rules.trunk_tilt_critical, 35.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nordic-gait.toml");
        let config = Config {
            thumbnail_dir: Some(dir.path().join("thumbnails")),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
