//! Drone — a delivery vehicle moving through a strict lifecycle.
//!
//! A drone owns its `loaded_items` exclusively while they are on board;
//! medications themselves are reference data (see [`crate::medication`]).
//! The lifecycle is a fixed state machine: the only legal transitions are
//! the edges encoded in [`DroneState::can_transition_to`]. `LOADING`,
//! `DELIVERING` and `RETURNING` are transient steps that callers never
//! observe between operations — services walk through them and persist
//! only the terminal state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, ValidationError};
use crate::medication::Medication;

/// Maximum serial number length, in characters.
pub const MAX_SERIAL_NUMBER_LENGTH: usize = 100;

/// Maximum configurable weight limit, in grams.
pub const MAX_WEIGHT_LIMIT: f64 = 500.0;

/// Minimum battery percentage required to begin loading.
pub const MIN_LOADING_BATTERY: u8 = 25;

/// The fixed set of drone models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneModel {
    Lightweight,
    Middleweight,
    Cruiserweight,
    Heavyweight,
}

impl fmt::Display for DroneModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lightweight => "Lightweight",
            Self::Middleweight => "Middleweight",
            Self::Cruiserweight => "Cruiserweight",
            Self::Heavyweight => "Heavyweight",
        };
        f.write_str(name)
    }
}

impl FromStr for DroneModel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lightweight" => Ok(Self::Lightweight),
            "Middleweight" => Ok(Self::Middleweight),
            "Cruiserweight" => Ok(Self::Cruiserweight),
            "Heavyweight" => Ok(Self::Heavyweight),
            other => Err(ValidationError::UnknownModel(other.to_string())),
        }
    }
}

/// Lifecycle state of a drone.
///
/// `Loading`, `Delivering` and `Returning` are transient: an operation
/// sets them and immediately advances to the next state, so a drone at
/// rest is always in `Idle`, `Loaded` or `Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroneState {
    Idle,
    Loading,
    Loaded,
    Delivering,
    Delivered,
    Returning,
}

impl DroneState {
    /// Whether `self -> next` is a legal lifecycle edge.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Loading)
                | (Self::Loading, Self::Loaded)
                | (Self::Loaded, Self::Idle)
                | (Self::Loaded, Self::Delivering)
                | (Self::Delivering, Self::Delivered)
                | (Self::Delivered, Self::Returning)
                | (Self::Returning, Self::Idle)
        )
    }
}

impl fmt::Display for DroneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Loading => "LOADING",
            Self::Loaded => "LOADED",
            Self::Delivering => "DELIVERING",
            Self::Delivered => "DELIVERED",
            Self::Returning => "RETURNING",
        };
        f.write_str(name)
    }
}

impl FromStr for DroneState {
    type Err = UnknownStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDLE" => Ok(Self::Idle),
            "LOADING" => Ok(Self::Loading),
            "LOADED" => Ok(Self::Loaded),
            "DELIVERING" => Ok(Self::Delivering),
            "DELIVERED" => Ok(Self::Delivered),
            "RETURNING" => Ok(Self::Returning),
            other => Err(UnknownStateError(other.to_string())),
        }
    }
}

/// A persisted state string did not name any [`DroneState`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown drone state: {0}")]
pub struct UnknownStateError(pub String);

/// Registration details for a new drone, as supplied by a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneRegistration {
    pub serial_number: String,
    pub model: DroneModel,
    pub weight_limit: f64,
    pub battery_capacity: u8,
}

/// A registered delivery drone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    /// Unique identifier, immutable once registered.
    pub serial_number: String,
    pub model: DroneModel,
    /// Maximum total medication weight, in grams. Immutable.
    pub weight_limit: f64,
    /// Battery gauge in percent, mutated by telemetry outside this core.
    pub battery_capacity: u8,
    pub state: DroneState,
    /// Medications currently on board, in load order.
    pub loaded_items: Vec<Medication>,
}

impl From<DroneRegistration> for Drone {
    /// A freshly registered drone always starts idle and empty.
    fn from(registration: DroneRegistration) -> Self {
        Self {
            serial_number: registration.serial_number,
            model: registration.model,
            weight_limit: registration.weight_limit,
            battery_capacity: registration.battery_capacity,
            state: DroneState::Idle,
            loaded_items: Vec::new(),
        }
    }
}

impl Drone {
    /// Check field-level invariants.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.serial_number.is_empty() {
            return Err(ValidationError::EmptySerialNumber);
        }
        if self.serial_number.chars().count() > MAX_SERIAL_NUMBER_LENGTH {
            return Err(ValidationError::SerialNumberTooLong);
        }
        if self.weight_limit <= 0.0 || self.weight_limit > MAX_WEIGHT_LIMIT {
            return Err(ValidationError::WeightLimitOutOfRange);
        }
        if self.battery_capacity > 100 {
            return Err(ValidationError::BatteryCapacityOutOfRange);
        }
        Ok(())
    }

    /// Total weight of the medications currently on board, in grams.
    #[must_use]
    pub fn total_load_weight(&self) -> f64 {
        self.loaded_items.iter().map(|m| m.weight).sum()
    }

    /// Advance the lifecycle to `next`, validating the edge.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::IllegalState`] carrying the state
    /// actually observed when `self.state -> next` is not a legal edge.
    /// The drone is left untouched on failure.
    pub fn transition_to(&mut self, next: DroneState) -> Result<(), LifecycleError> {
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::IllegalState {
                observed: self.state,
            });
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medication::Medication;

    fn drone() -> Drone {
        Drone::from(DroneRegistration {
            serial_number: "DRN-001".to_string(),
            model: DroneModel::Lightweight,
            weight_limit: 200.0,
            battery_capacity: 40,
        })
    }

    fn medication(code: &str, weight: f64) -> Medication {
        Medication {
            code: code.to_string(),
            name: "aspirin".to_string(),
            weight,
            image: None,
        }
    }

    #[test]
    fn should_start_idle_and_empty_after_registration() {
        let drone = drone();
        assert_eq!(drone.state, DroneState::Idle);
        assert!(drone.loaded_items.is_empty());
    }

    #[test]
    fn should_accept_valid_drone() {
        assert!(drone().validate().is_ok());
    }

    #[test]
    fn should_reject_empty_serial_number() {
        let mut drone = drone();
        drone.serial_number = String::new();
        assert_eq!(drone.validate(), Err(ValidationError::EmptySerialNumber));
    }

    #[test]
    fn should_reject_serial_number_over_100_chars() {
        let mut drone = drone();
        drone.serial_number = "X".repeat(101);
        assert_eq!(drone.validate(), Err(ValidationError::SerialNumberTooLong));
    }

    #[test]
    fn should_accept_serial_number_of_exactly_100_chars() {
        let mut drone = drone();
        drone.serial_number = "X".repeat(100);
        assert!(drone.validate().is_ok());
    }

    #[test]
    fn should_reject_weight_limit_above_500() {
        let mut drone = drone();
        drone.weight_limit = 500.5;
        assert_eq!(drone.validate(), Err(ValidationError::WeightLimitOutOfRange));
    }

    #[test]
    fn should_reject_zero_weight_limit() {
        let mut drone = drone();
        drone.weight_limit = 0.0;
        assert_eq!(drone.validate(), Err(ValidationError::WeightLimitOutOfRange));
    }

    #[test]
    fn should_sum_loaded_item_weights() {
        let mut drone = drone();
        drone.loaded_items = vec![medication("MED_1", 50.0), medication("MED_2", 75.0)];
        assert!((drone.total_load_weight() - 125.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_walk_full_delivery_cycle() {
        let mut drone = drone();
        for next in [
            DroneState::Loading,
            DroneState::Loaded,
            DroneState::Delivering,
            DroneState::Delivered,
            DroneState::Returning,
            DroneState::Idle,
        ] {
            drone.transition_to(next).unwrap();
            assert_eq!(drone.state, next);
        }
    }

    #[test]
    fn should_allow_unload_edge_from_loaded_to_idle() {
        let mut drone = drone();
        drone.transition_to(DroneState::Loading).unwrap();
        drone.transition_to(DroneState::Loaded).unwrap();
        drone.transition_to(DroneState::Idle).unwrap();
        assert_eq!(drone.state, DroneState::Idle);
    }

    #[test]
    fn should_reject_skipping_a_state() {
        let mut drone = drone();
        let err = drone.transition_to(DroneState::Delivering).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalState {
                observed: DroneState::Idle
            }
        );
        // failed transition leaves the drone untouched
        assert_eq!(drone.state, DroneState::Idle);
    }

    #[test]
    fn should_reject_delivering_directly_to_idle() {
        let mut drone = drone();
        drone.state = DroneState::Delivering;
        assert!(drone.transition_to(DroneState::Idle).is_err());
    }

    #[test]
    fn should_parse_and_display_states_symmetrically() {
        for state in [
            DroneState::Idle,
            DroneState::Loading,
            DroneState::Loaded,
            DroneState::Delivering,
            DroneState::Delivered,
            DroneState::Returning,
        ] {
            assert_eq!(state.to_string().parse::<DroneState>().unwrap(), state);
        }
    }

    #[test]
    fn should_reject_unknown_model_name() {
        let err = "Featherweight".parse::<DroneModel>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownModel("Featherweight".to_string())
        );
    }

    #[test]
    fn should_serialize_state_as_screaming_snake_case() {
        let json = serde_json::to_string(&DroneState::Delivering).unwrap();
        assert_eq!(json, "\"DELIVERING\"");
    }
}
