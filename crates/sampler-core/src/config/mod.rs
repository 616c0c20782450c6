//! Configuration for the sampler
//!
//! - Generic YAML config loading/saving
//! - Default config locations
//! - The [`SamplerConfig`] sections
//!
//! ```ignore
//! use sampler_core::config::{default_config_path, load_config, save_config, SamplerConfig};
//!
//! let path = default_config_path();
//! let config: SamplerConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;
mod sampler;

pub use io::{load_config, save_config, try_load_config};
pub use paths::{default_config_dir, default_config_path};
pub use sampler::{OutputConfig, PeaksConfig, PlaybackConfig, SamplerConfig, TrimConfig};
