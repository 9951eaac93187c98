//! Config loading facade: assembles the layered sources into a `RegistryConfig`.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::RegistryConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads `RegistryConfig` from defaults, files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence, lowest first: defaults, global file, `config/config.toml`,
    /// `config/{BEANSCOPE_ENV}.toml`, `BEANSCOPE__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<RegistryConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: RegistryConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            contexts = config.scopes.contexts.len(),
            "Loaded registry configuration"
        );
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<RegistryConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Path of the global config file, if a config directory can be determined
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Defaults only
    pub fn defaults() -> Result<RegistryConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .build()?
            .try_deserialize()
    }
}
