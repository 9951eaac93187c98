//! Host container bean model
//!
//! The host side describes beans with a [`BeanDefinition`] and produces them
//! through a [`BeanCreationContext`]. Each creation yields a [`CreatedBean`]:
//! the instance plus the teardown needed to release it.

use crate::annotation::AnnotationMetadata;
use crate::error::BeanError;
use crate::types::{BeanId, DefinitionKey, Instance, ScopeId};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Host description of a bean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDefinition {
    key: DefinitionKey,
    type_name: Arc<str>,
    qualifier: Option<Arc<str>>,
    scope: Option<ScopeId>,
}

impl BeanDefinition {
    /// Create a definition for the named bean type
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        let type_name = type_name.into();
        Self {
            key: DefinitionKey::new(Arc::clone(&type_name)),
            type_name,
            qualifier: None,
            scope: None,
        }
    }

    /// Create a definition named after the Rust type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Distinguish this definition from others of the same type
    pub fn named(mut self, qualifier: impl Into<Arc<str>>) -> Self {
        let qualifier = qualifier.into();
        self.key = DefinitionKey::new(format!("{}#{}", self.type_name, qualifier));
        self.qualifier = Some(qualifier);
        self
    }

    /// Declare the scope annotation of this bean
    pub fn in_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn key(&self) -> &DefinitionKey {
        &self.key
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

impl AnnotationMetadata for BeanDefinition {
    fn declared_scope(&self) -> Option<&ScopeId> {
        self.scope.as_ref()
    }
}

type CloseHook = Box<dyn FnOnce(&Instance) -> anyhow::Result<()> + Send>;

/// A created instance together with its teardown action
pub struct CreatedBean {
    bean: BeanId,
    definition: DefinitionKey,
    instance: Instance,
    on_close: Option<CloseHook>,
}

impl CreatedBean {
    pub fn new(bean: BeanId, definition: DefinitionKey, instance: Instance) -> Self {
        Self {
            bean,
            definition,
            instance,
            on_close: None,
        }
    }

    /// Attach the action that releases the instance's resources
    pub fn with_close_hook<H>(mut self, hook: H) -> Self
    where
        H: FnOnce(&Instance) -> anyhow::Result<()> + Send + 'static,
    {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub fn id(&self) -> BeanId {
        self.bean
    }

    pub fn definition(&self) -> &DefinitionKey {
        &self.definition
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Run the teardown action, consuming the handle
    pub fn close(mut self) -> Result<(), BeanError> {
        match self.on_close.take() {
            Some(hook) => hook(&self.instance).map_err(|source| BeanError::Close {
                bean: self.bean,
                definition: self.definition.clone(),
                source,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for CreatedBean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedBean")
            .field("bean", &self.bean)
            .field("definition", &self.definition)
            .field("has_close_hook", &self.on_close.is_some())
            .finish()
    }
}

/// Per-request creation context supplied by the host container
pub trait BeanCreationContext: Send + Sync {
    /// Definition of the bean being requested
    fn definition(&self) -> &Arc<BeanDefinition>;

    /// Stable identity of the requested bean
    fn id(&self) -> BeanId;

    /// Produce a new instance along with its teardown
    fn create(&self) -> Result<CreatedBean, BeanError>;
}

type Factory = Box<dyn Fn() -> anyhow::Result<Instance> + Send + Sync>;
type SharedCloseHook = Arc<dyn Fn(&Instance) -> anyhow::Result<()> + Send + Sync>;

/// Closure-backed [`BeanCreationContext`]
pub struct FactoryCreationContext {
    id: BeanId,
    definition: Arc<BeanDefinition>,
    factory: Factory,
    on_close: Option<SharedCloseHook>,
}

impl FactoryCreationContext {
    pub fn new<T, F>(id: BeanId, definition: Arc<BeanDefinition>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            id,
            definition,
            factory: Box::new(move || factory().map(|value| Arc::new(value) as Instance)),
            on_close: None,
        }
    }

    /// Run `hook` whenever an instance produced by this context is closed
    pub fn with_close_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&Instance) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(hook));
        self
    }
}

impl BeanCreationContext for FactoryCreationContext {
    fn definition(&self) -> &Arc<BeanDefinition> {
        &self.definition
    }

    fn id(&self) -> BeanId {
        self.id
    }

    fn create(&self) -> Result<CreatedBean, BeanError> {
        let instance = (self.factory)().map_err(|source| BeanError::Factory {
            bean: self.id,
            definition: self.definition.key().clone(),
            source,
        })?;

        let created = CreatedBean::new(self.id, self.definition.key().clone(), instance);
        Ok(match &self.on_close {
            Some(hook) => {
                let hook = Arc::clone(hook);
                created.with_close_hook(move |instance| hook(instance))
            }
            None => created,
        })
    }
}

impl fmt::Debug for FactoryCreationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryCreationContext")
            .field("id", &self.id)
            .field("definition", &self.definition.key())
            .finish()
    }
}
