//! Drone service — use-cases driving the delivery lifecycle.

use medfleet_domain::drone::{
    Drone, DroneRegistration, DroneState, MIN_LOADING_BATTERY,
};
use medfleet_domain::error::{
    AlreadyExistsError, LifecycleError, MedfleetError, NotFoundError,
};
use medfleet_domain::event::{FleetEvent, FleetEventKind};
use medfleet_domain::medication::Medication;

use crate::ports::{DroneRepository, EventPublisher, MedicationRepository};
use crate::serial_lock::SerialLocks;

/// Application service for the drone delivery lifecycle.
///
/// Every mutating operation is a read-modify-write sequence against one
/// drone record. By default nothing serializes those sequences: two
/// concurrent operations on the same serial number may both read the
/// same prior state, both pass their precondition checks, and overwrite
/// each other's persisted result. Callers that need stronger guarantees
/// than their store provides should construct the service with
/// [`DroneService::with_serialized_operations`], which routes every
/// mutating call through a per-serial-number async mutex. Read-only
/// operations never take the lock.
pub struct DroneService<DR, MR, EP> {
    drones: DR,
    medications: MR,
    events: EP,
    locks: Option<SerialLocks>,
}

impl<DR, MR, EP> DroneService<DR, MR, EP>
where
    DR: DroneRepository,
    MR: MedicationRepository,
    EP: EventPublisher,
{
    /// Create a new service backed by the given stores and event sink.
    pub fn new(drones: DR, medications: MR, events: EP) -> Self {
        Self {
            drones,
            medications,
            events,
            locks: None,
        }
    }

    /// Serialize mutating operations per serial number.
    ///
    /// Closes the lost-update window between two concurrent operations
    /// on the same drone at the cost of one async mutex per serial
    /// number.
    #[must_use]
    pub fn with_serialized_operations(mut self) -> Self {
        self.locks = Some(SerialLocks::new());
        self
    }

    /// Register a new drone. It enters the fleet idle and empty.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::Validation`] if a field invariant fails,
    /// [`MedfleetError::AlreadyExists`] if the serial number is taken,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, registration), fields(serial_number = %registration.serial_number))]
    pub async fn register(&self, registration: DroneRegistration) -> Result<Drone, MedfleetError> {
        let drone = Drone::from(registration);
        drone.validate()?;

        let _guard = self.lock(&drone.serial_number).await;
        if self
            .drones
            .find_by_serial_number(&drone.serial_number)
            .await?
            .is_some()
        {
            return Err(AlreadyExistsError::Drone {
                serial_number: drone.serial_number,
            }
            .into());
        }

        let drone = self.drones.save(drone).await?;
        self.events
            .publish(FleetEvent::new(
                drone.serial_number.as_str(),
                FleetEventKind::Registered,
            ))
            .await?;
        Ok(drone)
    }

    /// Current battery percentage of a drone. Pure read.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::NotFound`] for an unknown serial number,
    /// or a storage error from the repository.
    pub async fn check_battery(&self, serial_number: &str) -> Result<u8, MedfleetError> {
        let drone = self.find_drone(serial_number).await?;
        Ok(drone.battery_capacity)
    }

    /// All drones currently available for loading.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_idle(&self) -> Result<Vec<Drone>, MedfleetError> {
        self.drones.find_all_by_state(DroneState::Idle).await
    }

    /// Load a drone with the medications named by `medication_codes`.
    ///
    /// All checks run before anything is mutated; a failed load leaves
    /// the stored drone untouched. On success the drone carries the
    /// resolved medications in input order and rests in `LOADED`.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::EmptyLoad`] when `medication_codes` is empty.
    /// - [`MedfleetError::NotFound`] for an unknown serial number, or
    ///   for the first unresolved medication code in input order.
    /// - [`LifecycleError::IllegalState`] unless the drone is idle.
    /// - [`LifecycleError::BatteryTooLow`] below the 25% floor.
    /// - [`LifecycleError::LoadLimitExceeded`] when the resolved
    ///   medications together weigh more than the drone may carry.
    #[tracing::instrument(skip(self))]
    pub async fn load(
        &self,
        serial_number: &str,
        medication_codes: &[String],
    ) -> Result<(), MedfleetError> {
        if medication_codes.is_empty() {
            return Err(LifecycleError::EmptyLoad.into());
        }

        let _guard = self.lock(serial_number).await;
        let mut drone = self.find_drone(serial_number).await?;

        if drone.state != DroneState::Idle {
            return Err(LifecycleError::IllegalState {
                observed: drone.state,
            }
            .into());
        }
        if drone.battery_capacity < MIN_LOADING_BATTERY {
            return Err(LifecycleError::BatteryTooLow {
                min: MIN_LOADING_BATTERY,
                current: drone.battery_capacity,
            }
            .into());
        }

        let mut items = Vec::with_capacity(medication_codes.len());
        for code in medication_codes {
            let medication = self
                .medications
                .find_by_code(code)
                .await?
                .ok_or_else(|| NotFoundError::Medication { code: code.clone() })?;
            items.push(medication);
        }

        let total_weight: f64 = items.iter().map(|m| m.weight).sum();
        if total_weight > drone.weight_limit {
            return Err(LifecycleError::LoadLimitExceeded {
                limit: drone.weight_limit,
            }
            .into());
        }

        drone.loaded_items = items;
        let steps = walk(&mut drone, &[DroneState::Loading, DroneState::Loaded])?;
        let drone = self.drones.save(drone).await?;
        self.publish_transitions(&drone.serial_number, steps).await
    }

    /// Unload a drone, returning it to `IDLE` with an empty hold.
    ///
    /// Unloading an already idle drone is a successful no-op — nothing
    /// is persisted and no event is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::NotFound`] for an unknown serial number,
    /// or [`LifecycleError::IllegalState`] unless the drone is loaded
    /// or idle.
    #[tracing::instrument(skip(self))]
    pub async fn unload(&self, serial_number: &str) -> Result<(), MedfleetError> {
        let _guard = self.lock(serial_number).await;
        let mut drone = self.find_drone(serial_number).await?;

        match drone.state {
            DroneState::Idle => Ok(()),
            DroneState::Loaded => {
                drone.loaded_items.clear();
                let steps = walk(&mut drone, &[DroneState::Idle])?;
                let drone = self.drones.save(drone).await?;
                self.publish_transitions(&drone.serial_number, steps).await
            }
            observed => Err(LifecycleError::IllegalState { observed }.into()),
        }
    }

    /// Medications currently on board, in load order. Pure read.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::NotFound`] for an unknown serial number,
    /// or a storage error from the repository.
    pub async fn get_loaded_items(
        &self,
        serial_number: &str,
    ) -> Result<Vec<Medication>, MedfleetError> {
        let drone = self.find_drone(serial_number).await?;
        Ok(drone.loaded_items)
    }

    /// Send a loaded drone out and mark its cargo delivered.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::NotFound`] for an unknown serial number,
    /// or [`LifecycleError::IllegalState`] unless the drone is loaded.
    #[tracing::instrument(skip(self))]
    pub async fn deliver(&self, serial_number: &str) -> Result<(), MedfleetError> {
        let _guard = self.lock(serial_number).await;
        let mut drone = self.find_drone(serial_number).await?;

        let steps = walk(&mut drone, &[DroneState::Delivering, DroneState::Delivered])?;
        drone.loaded_items.clear();
        let drone = self.drones.save(drone).await?;
        self.publish_transitions(&drone.serial_number, steps).await
    }

    /// Bring a delivered drone home, resting it in `IDLE`.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::NotFound`] for an unknown serial number,
    /// or [`LifecycleError::IllegalState`] unless the drone has
    /// delivered.
    #[tracing::instrument(skip(self))]
    pub async fn return_drone(&self, serial_number: &str) -> Result<(), MedfleetError> {
        let _guard = self.lock(serial_number).await;
        let mut drone = self.find_drone(serial_number).await?;

        let steps = walk(&mut drone, &[DroneState::Returning, DroneState::Idle])?;
        let drone = self.drones.save(drone).await?;
        self.publish_transitions(&drone.serial_number, steps).await
    }

    async fn find_drone(&self, serial_number: &str) -> Result<Drone, MedfleetError> {
        self.drones
            .find_by_serial_number(serial_number)
            .await?
            .ok_or_else(|| {
                NotFoundError::Drone {
                    serial_number: serial_number.to_string(),
                }
                .into()
            })
    }

    async fn lock(
        &self,
        serial_number: &str,
    ) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(serial_number).await),
            None => None,
        }
    }

    async fn publish_transitions(
        &self,
        serial_number: &str,
        steps: Vec<(DroneState, DroneState)>,
    ) -> Result<(), MedfleetError> {
        for (from, to) in steps {
            self.events
                .publish(FleetEvent::state_changed(serial_number, from, to))
                .await?;
        }
        Ok(())
    }
}

/// Advance `drone` along `path` one edge at a time, recording each step.
///
/// The first illegal edge aborts with the state actually observed and
/// leaves the drone as it was before the failing step.
fn walk(
    drone: &mut Drone,
    path: &[DroneState],
) -> Result<Vec<(DroneState, DroneState)>, LifecycleError> {
    let mut steps = Vec::with_capacity(path.len());
    for &next in path {
        let from = drone.state;
        drone.transition_to(next)?;
        steps.push((from, next));
    }
    Ok(steps)
}
