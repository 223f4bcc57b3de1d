//! Storage port — repository traits for persistence.
//!
//! Implementations must make mutated fields durable before their `save`
//! future resolves; services rely on that to guarantee no-partial-
//! persistence semantics.

use std::future::Future;

use medfleet_domain::drone::{Drone, DroneState};
use medfleet_domain::error::MedfleetError;
use medfleet_domain::medication::Medication;
use medfleet_domain::user::AppUser;

/// Drone records, keyed by serial number.
pub trait DroneRepository {
    /// Look up a drone by its serial number.
    fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> impl Future<Output = Result<Option<Drone>, MedfleetError>> + Send;

    /// Persist a drone, inserting or replacing the record and its load
    /// list as a unit.
    fn save(&self, drone: Drone) -> impl Future<Output = Result<Drone, MedfleetError>> + Send;

    /// All drones currently in `state`, in persistence order.
    fn find_all_by_state(
        &self,
        state: DroneState,
    ) -> impl Future<Output = Result<Vec<Drone>, MedfleetError>> + Send;

    /// Every registered drone.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Drone>, MedfleetError>> + Send;
}

/// Medication catalog, keyed by code. Reference data — no mutation.
pub trait MedicationRepository {
    /// Look up a medication by its catalog code.
    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<Medication>, MedfleetError>> + Send;
}

/// Application user accounts.
pub trait AppUserRepository {
    /// Look up a user by email address.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AppUser>, MedfleetError>> + Send;

    /// Persist a user account.
    fn save(&self, user: AppUser) -> impl Future<Output = Result<AppUser, MedfleetError>> + Send;
}
