use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use shared::{ApiError, AuthUrlResponse};
use std::sync::Arc;

use crate::google::GoogleAuthError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// GET /auth - hand the browser a Google authorization URL.
pub async fn auth(State(state): State<Arc<AppState>>) -> Response {
    let Some(google) = &state.google else {
        return not_configured();
    };

    let url = google.authorize_url();
    tracing::debug!("authorization url: {url}");
    Json(AuthUrlResponse { url }).into_response()
}

/// GET /token?code=... - exchange an authorization code and relay the raw
/// token set. Mostly useful for poking at the flow with curl.
pub async fn token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CodeQuery>,
) -> Response {
    let Some(google) = &state.google else {
        return not_configured();
    };

    match google.exchange_code(&query.code).await {
        Ok(tokens) => Json(tokens).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /verify?token=... - verify an ID token the caller already holds.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Response {
    let Some(google) = &state.google else {
        return not_configured();
    };

    match google.verify_token(&query.token).await {
        Ok(claims) => Json(claims).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /verify/id_token?code=... - the callback page's one-stop endpoint:
/// exchange the code, verify the ID token, answer with its claims.
pub async fn verify_id_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CodeQuery>,
) -> Response {
    let Some(google) = &state.google else {
        return not_configured();
    };

    match google.verify_id_token_for_code(&query.code).await {
        Ok(claims) => Json(claims).into_response(),
        Err(e) => error_response(e),
    }
}

fn not_configured() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::internal_error("OAuth not configured")),
    )
        .into_response()
}

fn error_response(err: GoogleAuthError) -> Response {
    tracing::error!("google auth flow failed: {err}");
    let (status, body) = match err {
        GoogleAuthError::InvalidIssuer(_)
        | GoogleAuthError::AudienceMismatch(_)
        | GoogleAuthError::MalformedExpiry(_)
        | GoogleAuthError::Expired => (
            StatusCode::UNAUTHORIZED,
            ApiError::unauthorized(err.to_string()),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            ApiError::new("AUTH_FLOW_FAILED", err.to_string()),
        ),
    };
    (status, Json(body)).into_response()
}
