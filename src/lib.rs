//! Beanscope: Scope-Aware Bean Lifecycle Registry
//!
//! Maps scope identifiers to the contexts that store their instances, and
//! mediates creation, caching and destruction of scoped beans on behalf of a
//! dependency-injection container. Host-side creation contexts are bridged into
//! the contextual-instance protocol that contexts understand.

pub mod annotation;
pub mod bean;
pub mod config;
pub mod container;
pub mod context;
pub mod error;
pub mod logging;
pub mod scope;
pub mod types;

pub use bean::{BeanCreationContext, BeanDefinition, CreatedBean, FactoryCreationContext};
pub use container::{BeanContainer, ContextCatalog};
pub use context::{AlterableContext, Context, Contextual, CreationalContext, InMemoryContext};
pub use error::{BeanError, ContextError, RegistryError};
pub use scope::{ScopeHandle, ScopeRegistry};
pub use types::{BeanId, DefinitionKey, Instance, ScopeId};
