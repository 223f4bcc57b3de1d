//! JSON REST handlers for account management.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use medfleet_app::ports::{
    AppUserRepository, DroneRepository, EventPublisher, MedicationRepository,
};
use medfleet_domain::user::UserRegistration;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for signing in.
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// JSON body carrying a freshly issued bearer token.
#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// Possible responses from the sign-up endpoint.
pub enum SignUpResponse {
    Created(Json<TokenBody>),
}

impl IntoResponse for SignUpResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the sign-in endpoint.
pub enum SignInResponse {
    Ok(Json<TokenBody>),
}

impl IntoResponse for SignInResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /auth/sign_up`
pub async fn sign_up<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Json(registration): Json<UserRegistration>,
) -> Result<SignUpResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let token = state.auth_service.sign_up(registration).await?;
    Ok(SignUpResponse::Created(Json(TokenBody { token })))
}

/// `POST /auth/sign_in`
pub async fn sign_in<DR, MR, UR, EP>(
    State(state): State<AppState<DR, MR, UR, EP>>,
    Json(request): Json<SignInRequest>,
) -> Result<SignInResponse, ApiError>
where
    DR: DroneRepository + Send + Sync + 'static,
    MR: MedicationRepository + Send + Sync + 'static,
    UR: AppUserRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let token = state
        .auth_service
        .sign_in(&request.email, &request.password)
        .await?;
    Ok(SignInResponse::Ok(Json(TokenBody { token })))
}
