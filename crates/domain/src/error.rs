//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MedfleetError`] via `#[from]`. Adapters wrap their infrastructure
//! errors into the opaque `Storage` variant so the core never depends on
//! adapter crates.

use crate::drone::DroneState;

/// Top-level error type returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum MedfleetError {
    /// A field-level invariant failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A record with the same identifier already exists.
    #[error(transparent)]
    AlreadyExists(#[from] AlreadyExistsError),

    /// A drone lifecycle business rule was violated.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Credentials did not match a known user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Failure issuing a bearer token, boxed to keep this crate free
    /// of token-library dependencies.
    #[error("token error")]
    Token(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Failure in the persistence layer, boxed to keep this crate
    /// free of adapter dependencies.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("serial number must not be empty")]
    EmptySerialNumber,

    #[error("serial number must not exceed 100 characters")]
    SerialNumberTooLong,

    #[error("unknown drone model: {0}")]
    UnknownModel(String),

    #[error("weight limit must be positive and at most 500 grams")]
    WeightLimitOutOfRange,

    #[error("battery capacity must be between 0 and 100 percent")]
    BatteryCapacityOutOfRange,

    #[error("medication code may only contain uppercase letters, digits and underscores")]
    InvalidMedicationCode,

    #[error("medication name may only contain letters, digits, dashes and underscores")]
    InvalidMedicationName,

    #[error("medication weight must be positive")]
    InvalidMedicationWeight,

    #[error("name must not be empty")]
    EmptyName,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least 8 characters")]
    PasswordTooShort,
}

/// A looked-up record was missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("drone {serial_number} not found")]
    Drone { serial_number: String },

    #[error("medication with code {code} not found")]
    Medication { code: String },

    #[error("user {email} not found")]
    User { email: String },
}

/// A record creation collided with an existing identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlreadyExistsError {
    #[error("drone {serial_number} already exists")]
    Drone { serial_number: String },

    #[error("user {email} already exists")]
    User { email: String },
}

/// Violations of the drone lifecycle business rules.
///
/// Every variant carries the data a caller needs to branch on the
/// failure without parsing messages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    /// The operation is not allowed in the drone's current state.
    /// Always reports the state actually observed.
    #[error("operation not allowed in {observed} state")]
    IllegalState { observed: DroneState },

    /// Loading attempted below the battery floor.
    #[error("battery capacity below {min}%, current capacity is {current}%")]
    BatteryTooLow { min: u8, current: u8 },

    /// The requested medications together exceed the drone's limit.
    #[error("loading canceled, weight limit of {limit} grams exceeded")]
    LoadLimitExceeded { limit: f64 },

    /// Load requested with no medication codes.
    #[error("load is empty")]
    EmptyLoad,
}
