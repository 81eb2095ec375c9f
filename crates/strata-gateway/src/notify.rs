//! Change-notification sink
//!
//! After a successful mutation the gateway notifies every identifier
//! sharing the mutated route code. The sink is the boundary to whatever
//! the host uses for change propagation; notifications are
//! fire-and-forget.

use strata_core::ResourceIdentifier;

/// Receives change notifications for mutated resources.
pub trait ChangeSink: Send + Sync {
    /// A resource behind `identifier` changed.
    fn notify_changed(&self, identifier: &ResourceIdentifier);
}

/// A sink that discards notifications, for compositions without change
/// propagation.
#[derive(Debug, Default)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn notify_changed(&self, _identifier: &ResourceIdentifier) {}
}
