//! Error types for the scope registry.
//!
//! Host-side failures (`BeanError`) are raised by bean factories and destroy
//! hooks. The contextual protocol re-signals them as `ContextError`, keeping the
//! host error attached as the source.

use crate::types::{BeanId, DefinitionKey, ScopeId};
use thiserror::Error;

/// Host container errors raised while producing or tearing down a bean
#[derive(Debug, Error)]
pub enum BeanError {
    #[error("Factory for {bean} ({definition}) failed: {source}")]
    Factory {
        bean: BeanId,
        definition: DefinitionKey,
        #[source]
        source: anyhow::Error,
    },

    #[error("Closing {bean} ({definition}) failed: {source}")]
    Close {
        bean: BeanId,
        definition: DefinitionKey,
        #[source]
        source: anyhow::Error,
    },
}

/// Contextual-instance protocol errors
#[derive(Debug, Error)]
pub enum ContextError {
    /// The creational context handed to a contextual is not of the expected kind.
    #[error("Creational context protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Creation of {definition} failed: {source}")]
    Creation {
        definition: DefinitionKey,
        #[source]
        source: BeanError,
    },

    #[error("Destruction of {definition} failed: {source}")]
    Destruction {
        definition: DefinitionKey,
        #[source]
        source: BeanError,
    },

    #[error("Context for scope {0} is not active")]
    ContextNotActive(ScopeId),

    #[error("Instance of {definition} is not a {expected}")]
    TypeMismatch {
        definition: DefinitionKey,
        expected: &'static str,
    },
}

/// Registry-level errors (configuration and setup)
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),
}

impl From<config::ConfigError> for RegistryError {
    fn from(err: config::ConfigError) -> Self {
        RegistryError::ConfigError(err.to_string())
    }
}
