//! Event bus port — fan-out of fleet events to in-process subscribers.

use std::future::Future;

use medfleet_domain::error::MedfleetError;
use medfleet_domain::event::FleetEvent;

/// Publishing side of the event bus.
pub trait EventPublisher {
    /// Publish a fleet event. Must succeed even with no subscribers.
    fn publish(
        &self,
        event: FleetEvent,
    ) -> impl Future<Output = Result<(), MedfleetError>> + Send;
}
