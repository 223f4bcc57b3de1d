//! Application services — one per use-case cluster.

pub mod auth_service;
pub mod drone_service;
