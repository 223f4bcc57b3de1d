//! Axum router assembly.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use medfleet_app::ports::{
    AppUserRepository, DroneRepository, EventPublisher, MedicationRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Account endpoints live under `/auth` and are open; every fleet
/// endpoint under `/drones` sits behind the bearer middleware.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<DR, MR, UR, EP>(state: AppState<DR, MR, UR, EP>) -> Router
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let signer = Arc::clone(&state.signer);
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", crate::api::auth_routes())
        .nest(
            "/drones",
            crate::api::drone_routes().route_layer(middleware::from_fn_with_state(
                signer,
                crate::auth::require_bearer,
            )),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
