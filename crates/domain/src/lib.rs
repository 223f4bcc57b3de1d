//! # medfleet-domain
//!
//! Pure domain model for the medfleet drone delivery backend.
//!
//! ## Responsibilities
//! - Define **Drones** (delivery vehicles with a weight limit, a battery
//!   gauge, and a strict lifecycle state machine)
//! - Define **Medications** (reference items drones carry, keyed by code)
//! - Define **Users** (application accounts for the authentication layer)
//! - Define **Fleet events** (state-transition records for observability)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod drone;
pub mod event;
pub mod medication;
pub mod user;
