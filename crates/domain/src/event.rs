//! Fleet events — records of drone lifecycle activity.
//!
//! Services emit one event per recorded state transition, transient
//! steps included, even though persistence only ever sees the collapsed
//! terminal state. Subscribers use them for logging or live views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::drone::DroneState;

/// What happened to a drone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FleetEventKind {
    /// A new drone entered the fleet.
    Registered,
    /// The drone moved along one lifecycle edge.
    StateChanged { from: DroneState, to: DroneState },
}

/// A single fleet event, stamped at emission time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetEvent {
    pub serial_number: String,
    pub kind: FleetEventKind,
    pub occurred_at: DateTime<Utc>,
}

impl FleetEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(serial_number: impl Into<String>, kind: FleetEventKind) -> Self {
        Self {
            serial_number: serial_number.into(),
            kind,
            occurred_at: Utc::now(),
        }
    }

    /// Shorthand for a state-transition event.
    #[must_use]
    pub fn state_changed(serial_number: impl Into<String>, from: DroneState, to: DroneState) -> Self {
        Self::new(serial_number, FleetEventKind::StateChanged { from, to })
    }
}
