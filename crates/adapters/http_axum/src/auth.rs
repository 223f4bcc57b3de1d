//! Bearer-token middleware guarding the fleet routes.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use medfleet_app::token::TokenSigner;

use crate::error::ErrorBody;

/// Reject the request unless it carries a valid `Authorization: Bearer`
/// header. Verified claims are stored in the request extensions for
/// handlers that care who is calling.
pub async fn require_bearer(
    State(signer): State<Arc<TokenSigner>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token.map(|token| signer.verify(token)) {
        Some(Ok(claims)) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Some(Err(err)) => {
            tracing::debug!(error = %err, "rejected bearer token");
            unauthorized()
        }
        None => unauthorized(),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: "missing or invalid bearer token".to_string(),
        }),
    )
        .into_response()
}
