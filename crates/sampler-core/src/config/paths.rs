//! Standard locations for sampler configuration

use std::path::PathBuf;

/// Directory holding sampler configuration
///
/// Returns: `{config_dir}/sampler` (e.g. `~/.config/sampler` on Linux),
/// falling back to `./sampler` when the platform has no config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sampler")
}

/// Default config file path
///
/// Returns: `{config_dir}/sampler/config.yaml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}
