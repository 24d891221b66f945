//! Configuration management
//!
//! Sources are layered with precedence: env > file > CLI > defaults.
//! Callers seed the builder with CLI values and the loaders here
//! override them.

mod builder;
mod env;
mod file;

pub use builder::{
    Config, ConfigBuilder, GateConfig, SessionConfig, TelemetryConfig, TenantBinding,
};

use crate::Result;

/// Layer the first config file found and then the environment over `builder`
pub fn load_config(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(path) = file::find_config_file() {
        tracing::info!("Loading configuration from {}", path.display());
        builder = file::load_from_file(&path, builder)?;
    }

    env::load_from_env(builder)
}

/// Layer a specific config file and then the environment over `builder`
pub fn load_config_from_path(
    path: &std::path::Path,
    builder: ConfigBuilder,
) -> Result<ConfigBuilder> {
    let builder = file::load_from_file(path, builder)?;
    env::load_from_env(builder)
}
