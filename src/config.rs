//! Configuration System
//!
//! Layered configuration for the scope registry: merge-policy defaults, the
//! global config file, workspace config files, then `BEANSCOPE__` environment
//! variables. Validation reports every problem at once.

use crate::annotation::{Dependent, ScopeAnnotation};
use crate::logging::LoggingConfig;
use crate::types::ScopeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Scope settings
    #[serde(default)]
    pub scopes: ScopeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scope settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Scope treated as "no custom scope" when declared on a bean
    #[serde(default = "default_scope")]
    pub default_scope: ScopeId,

    /// In-memory contexts to register
    #[serde(default)]
    pub contexts: Vec<ContextConfig>,
}

/// One in-memory context registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Scope identifier governed by the context
    pub scope: ScopeId,

    /// Whether instances can be destroyed individually
    #[serde(default = "default_true")]
    pub alterable: bool,
}

fn default_scope() -> ScopeId {
    Dependent::scope_id()
}

fn default_true() -> bool {
    true
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            default_scope: default_scope(),
            contexts: Vec::new(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Scope(String, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scope(name, msg) => {
                write!(f, "Scope '{}': {}", name, msg)
            }
            ValidationError::Logging(msg) => {
                write!(f, "Logging: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ScopeConfig {
    fn validate(&self, errors: &mut Vec<ValidationError>) {
        if self.default_scope.as_str().trim().is_empty() {
            errors.push(ValidationError::Scope(
                self.default_scope.to_string(),
                "Default scope cannot be empty".to_string(),
            ));
        }

        let mut seen = HashMap::new();
        for (index, context) in self.contexts.iter().enumerate() {
            if context.scope.as_str().trim().is_empty() {
                errors.push(ValidationError::Scope(
                    context.scope.to_string(),
                    format!("Context #{} has an empty scope identifier", index),
                ));
                continue;
            }
            if context.scope == self.default_scope {
                errors.push(ValidationError::Scope(
                    context.scope.to_string(),
                    "A context cannot govern the default scope".to_string(),
                ));
            }
            if let Some(previous) = seen.insert(context.scope.as_str(), index) {
                errors.push(ValidationError::Scope(
                    context.scope.to_string(),
                    format!(
                        "Duplicate context (contexts #{} and #{})",
                        previous, index
                    ),
                ));
            }
        }
    }
}

impl RegistryConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        self.scopes.validate(&mut errors);

        if !matches!(self.logging.format.as_str(), "json" | "text") {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}' (must be 'json' or 'text')",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
