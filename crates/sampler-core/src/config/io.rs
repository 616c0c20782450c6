//! YAML configuration I/O
//!
//! Two flavours of loading: [`load_config`] never fails and falls back to
//! defaults (for UI hosts that must start regardless), [`try_load_config`]
//! reports what went wrong (for tools where a bad file should be loud).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load configuration, falling back to `T::default()` on any problem
///
/// A missing file is silent (info); an unreadable or invalid one logs a warning.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("load_config: {:?} doesn't exist, using defaults", path);
        return T::default();
    }

    match try_load_config(path) {
        Ok(config) => {
            log::info!("load_config: loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

/// Load configuration, returning an error for a missing, unreadable or invalid file
pub fn try_load_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Save configuration as YAML, creating parent directories as needed
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplerConfig;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: SamplerConfig = load_config(Path::new("/nonexistent/path/config.yaml"));
        assert_eq!(config, SamplerConfig::default());
        assert!(try_load_config::<SamplerConfig>(Path::new("/nonexistent/path/config.yaml")).is_err());
    }

    #[test]
    fn test_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = SamplerConfig::default();
        config.playback.speed_ramp_ms = 40.0;
        config.peaks.stride = Some(3);
        config.output.device_name = Some("pulse".to_string());

        save_config(&config, &path).unwrap();
        let loaded: SamplerConfig = load_config(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "playback: [not, a, map").unwrap();

        let loaded: SamplerConfig = load_config(&path);
        assert_eq!(loaded, SamplerConfig::default());
        assert!(try_load_config::<SamplerConfig>(&path).is_err());
    }
}
