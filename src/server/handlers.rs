use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::{ApiResponse, Credentials, CustomerLogQuery, PullSkuRequest};
use crate::server::server::AppState;
use crate::utils::constants::{INTERNAL_ERROR, VALIDATION_ERROR};

/// Envelope as JSON; validation failures map to 422, everything else to 200.
fn envelope(response: ApiResponse) -> Response {
    let status = match response.error_code() {
        Some(VALIDATION_ERROR) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (status, Json(response.to_envelope())).into_response()
}

/// Bodies or queries axum could not parse get the same envelope as failed validation.
fn rejected(reason: String) -> Response {
    envelope(ApiResponse::error(reason, VALIDATION_ERROR))
}

pub async fn external_sign_in(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let Json(credentials) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    if credentials.api_key.trim().is_empty() || credentials.client_id.trim().is_empty() {
        return envelope(ApiResponse::error(
            "apiKey and clientId are required",
            VALIDATION_ERROR,
        ));
    }
    envelope(state.client.external_sign_in(&credentials).await)
}

pub async fn get_catalogue(State(state): State<AppState>) -> Response {
    envelope(state.client.get_catalogue().await)
}

pub async fn pull_sku(
    State(state): State<AppState>,
    payload: Result<Json<PullSkuRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    envelope(state.client.pull_sku(&request).await)
}

pub async fn get_customer_log(
    State(state): State<AppState>,
    query: Result<Query<CustomerLogQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    envelope(state.client.get_customer_log(&query).await)
}

pub async fn get_token(State(state): State<AppState>) -> Response {
    match state.client.ensure_valid_token().await {
        Ok(token) => Json(json!({
            "success": true,
            "data": { "accessToken": token }
        }))
        .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(err.to_string(), INTERNAL_ERROR).to_envelope()),
        )
            .into_response(),
    }
}
