//! Environment source: BEANSCOPE__SECTION__KEY variables.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add environment overrides, e.g. `BEANSCOPE__SCOPES__DEFAULT_SCOPE`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("BEANSCOPE")
            .prefix_separator("__")
            .separator("__"),
    )
}
