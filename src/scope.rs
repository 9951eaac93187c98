//! Custom scopes over contextual contexts
//!
//! The [`ScopeRegistry`] maps scope identifiers to [`ScopeHandle`]s. A handle
//! serves host creation requests through its context, using a
//! [`BridgingContextual`] to translate between the host creation protocol and
//! the contextual protocol, and a [`CreatedBeanCarrier`] to carry each created
//! bean from its creation to its destruction.

pub mod bridge;
pub mod carrier;
pub mod handle;
pub mod registry;

pub use bridge::BridgingContextual;
pub use carrier::CreatedBeanCarrier;
pub use handle::ScopeHandle;
pub use registry::ScopeRegistry;
