//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod auth;
#[allow(clippy::missing_errors_doc)]
pub mod drones;

use axum::Router;
use axum::routing::{get, post};

use medfleet_app::ports::{
    AppUserRepository, DroneRepository, EventPublisher, MedicationRepository,
};

use crate::state::AppState;

/// Build the `/drones` sub-router.
pub fn drone_routes<DR, MR, UR, EP>() -> Router<AppState<DR, MR, UR, EP>>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(drones::register::<DR, MR, UR, EP>))
        .route(
            "/check_battery/{serial_number}",
            get(drones::check_battery::<DR, MR, UR, EP>),
        )
        .route("/get_idles", get(drones::get_idles::<DR, MR, UR, EP>))
        .route("/load/{serial_number}", post(drones::load::<DR, MR, UR, EP>))
        .route(
            "/unload/{serial_number}",
            post(drones::unload::<DR, MR, UR, EP>),
        )
        .route(
            "/get_loads/{serial_number}",
            get(drones::get_loads::<DR, MR, UR, EP>),
        )
        .route(
            "/deliver/{serial_number}",
            post(drones::deliver::<DR, MR, UR, EP>),
        )
        .route(
            "/return/{serial_number}",
            post(drones::return_drone::<DR, MR, UR, EP>),
        )
}

/// Build the `/auth` sub-router.
pub fn auth_routes<DR, MR, UR, EP>() -> Router<AppState<DR, MR, UR, EP>>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/sign_up", post(auth::sign_up::<DR, MR, UR, EP>))
        .route("/sign_in", post(auth::sign_in::<DR, MR, UR, EP>))
}
