//! Per-workspace registry settings kept under `<workspace>/config/`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

const ENV_VAR: &str = "BEANSCOPE_ENV";
const DEFAULT_ENV: &str = "development";

/// Candidate files for `workspace_root`, lowest precedence first.
///
/// The shared `config.toml` comes first, then the file named after the active
/// environment (`BEANSCOPE_ENV`, `development` when unset).
pub fn layer_paths(workspace_root: &Path) -> Vec<PathBuf> {
    let dir = workspace_root.join("config");
    let environment = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
    vec![
        dir.join("config.toml"),
        dir.join(format!("{}.toml", environment)),
    ]
}

/// Layer every workspace file that exists onto `builder`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(layer_paths(workspace_root)
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            builder.add_source(File::from(path).required(false))
        }))
}
