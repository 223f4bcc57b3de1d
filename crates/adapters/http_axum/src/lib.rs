//! # medfleet-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the fleet REST API (`/drones/...`) and the authentication
//!   endpoints (`/auth/sign_up`, `/auth/sign_in`)
//! - Require a bearer token on every fleet route
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application errors into HTTP status codes and JSON bodies
//!
//! ## Dependency rule
//! Depends on `medfleet-app` (for port traits and services) and
//! `medfleet-domain` (for domain types used in request/response
//! mapping). Never leaks axum types into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
