//! JSON REST handlers for the drone fleet.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use medfleet_app::ports::{
    AppUserRepository, DroneRepository, EventPublisher, MedicationRepository,
};
use medfleet_domain::drone::{Drone, DroneRegistration};
use medfleet_domain::medication::Medication;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body acknowledging a lifecycle action.
#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: &'static str,
}

impl StatusBody {
    fn success(message: &'static str) -> Json<Self> {
        Json(Self {
            status: "success",
            message,
        })
    }
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<Drone>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the battery endpoint.
pub enum BatteryResponse {
    Ok(Json<u8>),
}

impl IntoResponse for BatteryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the idle listing endpoint.
pub enum ListIdleResponse {
    Ok(Json<Vec<Drone>>),
}

impl IntoResponse for ListIdleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the loaded-items endpoint.
pub enum LoadsResponse {
    Ok(Json<Vec<Medication>>),
}

impl IntoResponse for LoadsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the lifecycle action endpoints.
pub enum ActionResponse {
    Ok(Json<StatusBody>),
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /drones/register`
pub async fn register<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Json(registration): Json<DroneRegistration>,
) -> Result<RegisterResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let drone = state.drone_service.register(registration).await?;
    Ok(RegisterResponse::Created(Json(drone)))
}

/// `GET /drones/check_battery/{serial_number}`
pub async fn check_battery<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Path(serial_number): Path<String>,
) -> Result<BatteryResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let battery = state.drone_service.check_battery(&serial_number).await?;
    Ok(BatteryResponse::Ok(Json(battery)))
}

/// `GET /drones/get_idles`
pub async fn get_idles<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
) -> Result<ListIdleResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let drones = state.drone_service.list_idle().await?;
    Ok(ListIdleResponse::Ok(Json(drones)))
}

/// `POST /drones/load/{serial_number}`
pub async fn load<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Path(serial_number): Path<String>,
    Json(medication_codes): Json<Vec<String>>,
) -> Result<ActionResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    state
        .drone_service
        .load(&serial_number, &medication_codes)
        .await?;
    Ok(ActionResponse::Ok(StatusBody::success("Drone loaded")))
}

/// `POST /drones/unload/{serial_number}`
pub async fn unload<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Path(serial_number): Path<String>,
) -> Result<ActionResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    state.drone_service.unload(&serial_number).await?;
    Ok(ActionResponse::Ok(StatusBody::success("Drone unloaded")))
}

/// `GET /drones/get_loads/{serial_number}`
pub async fn get_loads<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Path(serial_number): Path<String>,
) -> Result<LoadsResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let items = state.drone_service.get_loaded_items(&serial_number).await?;
    Ok(LoadsResponse::Ok(Json(items)))
}

/// `POST /drones/deliver/{serial_number}`
pub async fn deliver<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Path(serial_number): Path<String>,
) -> Result<ActionResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    state.drone_service.deliver(&serial_number).await?;
    Ok(ActionResponse::Ok(StatusBody::success("Drone delivered")))
}

/// `POST /drones/return/{serial_number}`
pub async fn return_drone<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Path(serial_number): Path<String>,
) -> Result<ActionResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    state.drone_service.return_drone(&serial_number).await?;
    Ok(ActionResponse::Ok(StatusBody::success("Drone returned")))
}
