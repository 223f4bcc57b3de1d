//! # medfleet-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DroneRepository` — drone records keyed by serial number
//!   - `MedicationRepository` — medication catalog lookups
//!   - `AppUserRepository` — user accounts keyed by email
//!   - `EventPublisher` — fleet event fan-out
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DroneService` — register, load, unload, deliver, return, queries
//!   - `AuthService` — sign-up, sign-in, token issuance
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   event bus, per-serial lock registry, JWT signer, battery monitor
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `medfleet-domain` only (plus `tokio::sync`/`tokio::time` and
//! the token/hash crates). Never imports adapter crates. Adapters depend
//! on *this* crate, not the reverse.

pub mod battery_monitor;
pub mod event_bus;
pub mod ports;
pub mod serial_lock;
pub mod services;
pub mod token;
