//! Creational context carrier
//!
//! Threads the [`CreatedBean`] produced inside a context's creation callback
//! through to the later destroy callback. One carrier per get-or-create attempt.

use crate::bean::CreatedBean;
use crate::context::CreationalContext;
use parking_lot::Mutex;
use std::any::Any;

#[derive(Debug, Default)]
pub struct CreatedBeanCarrier {
    created: Mutex<Option<CreatedBean>>,
}

impl CreatedBeanCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the created bean. A carrier accepts exactly one; a second bean is
    /// handed back to the caller.
    pub fn set_created_bean(&self, bean: CreatedBean) -> Result<(), CreatedBean> {
        let mut created = self.created.lock();
        if created.is_some() {
            return Err(bean);
        }
        *created = Some(bean);
        Ok(())
    }

    /// Take the created bean, leaving the carrier empty
    pub fn take_created_bean(&self) -> Option<CreatedBean> {
        self.created.lock().take()
    }

    pub fn has_created_bean(&self) -> bool {
        self.created.lock().is_some()
    }
}

impl CreationalContext for CreatedBeanCarrier {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
