//! Merge rules: defaults, override order, conflict handling.

use crate::annotation::{Dependent, ScopeAnnotation};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override these key by key. The `scopes.contexts` list is
/// replaced wholesale by the highest layer that defines it.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("scopes.default_scope", Dependent::NAME)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stdout")
}
