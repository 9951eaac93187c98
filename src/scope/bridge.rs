//! Bridge from the host creation protocol to the contextual protocol
//!
//! A [`BridgingContextual`] is either a lookup key (definition only) or bound to
//! the host [`BeanCreationContext`] that can actually produce the bean. Both
//! compare equal when they share a definition key.

use super::carrier::CreatedBeanCarrier;
use crate::bean::{BeanCreationContext, BeanDefinition};
use crate::context::{Contextual, CreationalContext};
use crate::error::ContextError;
use crate::types::{DefinitionKey, Instance};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct BridgingContextual {
    definition: Arc<BeanDefinition>,
    creation: Option<Arc<dyn BeanCreationContext>>,
}

impl BridgingContextual {
    /// Contextual used only to address a cached instance
    pub fn lookup(definition: Arc<BeanDefinition>) -> Self {
        Self {
            definition,
            creation: None,
        }
    }

    /// Contextual that creates through the host creation context
    pub fn bound(creation: Arc<dyn BeanCreationContext>) -> Self {
        Self {
            definition: Arc::clone(creation.definition()),
            creation: Some(creation),
        }
    }

    pub fn definition(&self) -> &Arc<BeanDefinition> {
        &self.definition
    }

    pub fn is_bound(&self) -> bool {
        self.creation.is_some()
    }

    fn carrier<'a>(
        &self,
        creational: &'a dyn CreationalContext,
    ) -> Result<&'a CreatedBeanCarrier, ContextError> {
        creational
            .as_any()
            .downcast_ref::<CreatedBeanCarrier>()
            .ok_or_else(|| {
                warn!(
                    definition = %self.definition.key(),
                    "Foreign creational context handed to bridging contextual"
                );
                ContextError::ProtocolViolation(format!(
                    "{} expects a bean carrier as its creational context",
                    self.definition.key()
                ))
            })
    }
}

impl Contextual for BridgingContextual {
    fn key(&self) -> &DefinitionKey {
        self.definition.key()
    }

    fn create(&self, creational: &dyn CreationalContext) -> Result<Instance, ContextError> {
        let carrier = self.carrier(creational)?;
        let creation = self.creation.as_ref().ok_or_else(|| {
            ContextError::ProtocolViolation(format!(
                "{} is a lookup contextual and cannot create",
                self.definition.key()
            ))
        })?;

        let created = creation.create().map_err(|source| ContextError::Creation {
            definition: self.definition.key().clone(),
            source,
        })?;
        let bean = created.id();
        let instance = Arc::clone(created.instance());

        if let Err(rejected) = carrier.set_created_bean(created) {
            if let Err(err) = rejected.close() {
                warn!(error = %err, "Failed to close bean rejected by carrier");
            }
            return Err(ContextError::ProtocolViolation(format!(
                "carrier for {} was reused for a second creation",
                self.definition.key()
            )));
        }

        debug!(%bean, definition = %self.definition.key(), "Bean created");
        Ok(instance)
    }

    fn destroy(
        &self,
        _instance: &Instance,
        creational: &dyn CreationalContext,
    ) -> Result<(), ContextError> {
        let carrier = self.carrier(creational)?;
        let Some(created) = carrier.take_created_bean() else {
            return Ok(());
        };

        let bean = created.id();
        created.close().map_err(|source| ContextError::Destruction {
            definition: self.definition.key().clone(),
            source,
        })?;
        debug!(%bean, definition = %self.definition.key(), "Bean destroyed");
        Ok(())
    }
}

impl PartialEq for BridgingContextual {
    fn eq(&self, other: &Self) -> bool {
        self.definition.key() == other.definition.key()
    }
}

impl Eq for BridgingContextual {}

impl Hash for BridgingContextual {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.key().hash(state);
    }
}

impl fmt::Debug for BridgingContextual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgingContextual")
            .field("definition", self.definition.key())
            .field("bound", &self.is_bound())
            .finish()
    }
}
