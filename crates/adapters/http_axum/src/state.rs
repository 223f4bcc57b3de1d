//! Shared application state for axum handlers.

use std::sync::Arc;

use medfleet_app::ports::{
    AppUserRepository, DroneRepository, EventPublisher, MedicationRepository,
};
use medfleet_app::services::auth_service::AuthService;
use medfleet_app::services::drone_service::DroneService;
use medfleet_app::token::TokenSigner;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types and event publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone` — only the `Arc` wrappers
/// are cloned.
pub struct AppState<DR, MR, UR, EP> {
    /// Drone lifecycle service.
    pub drone_service: Arc<DroneService<DR, MR, EP>>,
    /// Account management service.
    pub auth_service: Arc<AuthService<UR>>,
    /// Token signer shared with the bearer middleware.
    pub signer: Arc<TokenSigner>,
}

impl<DR, MR, UR, EP> Clone for AppState<DR, MR, UR, EP> {
    fn clone(&self) -> Self {
        Self {
            drone_service: Arc::clone(&self.drone_service),
            auth_service: Arc::clone(&self.auth_service),
            signer: Arc::clone(&self.signer),
        }
    }
}

impl<DR, MR, UR, EP> AppState<DR, MR, UR, EP>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        drone_service: DroneService<DR, MR, EP>,
        auth_service: AuthService<UR>,
        signer: Arc<TokenSigner>,
    ) -> Self {
        Self {
            drone_service: Arc::new(drone_service),
            auth_service: Arc::new(auth_service),
            signer,
        }
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when services need to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(
        drone_service: Arc<DroneService<DR, MR, EP>>,
        auth_service: Arc<AuthService<UR>>,
        signer: Arc<TokenSigner>,
    ) -> Self {
        Self {
            drone_service,
            auth_service,
            signer,
        }
    }
}
