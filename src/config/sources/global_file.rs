//! Global config file source: $XDG_CONFIG_HOME/beanscope/config.toml, falling
//! back to the platform config directory.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use directories::BaseDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    let config_home = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))?;
    Some(config_home.join("beanscope").join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Some(path) = global_config_path() else {
        return Ok(builder);
    };

    if path.exists() {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        Ok(builder.add_source(File::from(canonical).required(false)))
    } else {
        debug!(
            config_path = %path.display(),
            "No global configuration file; using defaults"
        );
        Ok(builder)
    }
}
