use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use doppel::constants::{
    DOPPEL_STATUS_HEADER, DOPPEL_STATUS_OK, REASON_NO_EXISTING_QUESTIONS,
    REASON_NOT_ENOUGH_QUESTIONS,
};
use doppel::{CheckOutcome, GroupOutcome};

use super::auth::AuthenticatedUser;
use super::error::GatewayError;
use super::middleware::ClientKey;
use super::payload::{
    ANSWER_NO, ANSWER_YES, CheckResponse, CheckSimilarityPayload, GroupPayload, GroupResponse,
    LoginPayload, LoginResponse,
};
use super::rate_limit::FixedWindowLimiter;
use super::state::HandlerState;

fn enforce(limiter: &FixedWindowLimiter, client: &ClientKey) -> Result<(), GatewayError> {
    limiter.check(&client.0).map_err(|retry_after| {
        info!(client = %client.0, "Rate limit exceeded");
        GatewayError::RateLimited { retry_after }
    })
}

fn parse_body<T: DeserializeOwned>(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<T, GatewayError> {
    let Json(value) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    serde_json::from_value(value)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

fn ok_response<T: serde::Serialize>(body: T) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(DOPPEL_STATUS_HEADER, HeaderValue::from_static(DOPPEL_STATUS_OK));
    (StatusCode::OK, headers, Json(body)).into_response()
}

#[instrument(skip(state, client, body), fields(client = %client.0))]
pub async fn login_handler(
    State(state): State<HandlerState>,
    Extension(client): Extension<ClientKey>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    enforce(&state.limits.login, &client)?;

    let payload: LoginPayload = parse_body(body)?;
    let access_token = state.tokens.login(&payload.username, &payload.password)?;

    info!(user = %payload.username, "Issued access token");
    Ok(ok_response(LoginResponse { access_token }))
}

#[instrument(skip(state, client, user, body), fields(client = %client.0, user = %user.0.sub))]
pub async fn check_similarity_handler(
    State(state): State<HandlerState>,
    Extension(client): Extension<ClientKey>,
    user: AuthenticatedUser,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    enforce(&state.limits.check, &client)?;

    let request = parse_body::<CheckSimilarityPayload>(body)?.into_request()?;
    debug!(url = %request.questions_url, "Checking question");

    let body = match state.detector.check(&request).await? {
        CheckOutcome::InvalidQuestion { reason } => {
            return Err(GatewayError::InvalidQuestion { reason });
        }
        CheckOutcome::NoExistingQuestions => CheckResponse {
            response: ANSWER_NO,
            reason: Some(REASON_NO_EXISTING_QUESTIONS),
            matched_questions: None,
        },
        CheckOutcome::NoMatch => CheckResponse {
            response: ANSWER_NO,
            reason: None,
            matched_questions: None,
        },
        CheckOutcome::Matched(matches) => CheckResponse {
            response: ANSWER_YES,
            reason: None,
            matched_questions: Some(matches),
        },
    };

    Ok(ok_response(body))
}

#[instrument(skip(state, client, user, body), fields(client = %client.0, user = %user.0.sub))]
pub async fn group_similar_questions_handler(
    State(state): State<HandlerState>,
    Extension(client): Extension<ClientKey>,
    user: AuthenticatedUser,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    enforce(&state.limits.group, &client)?;

    let request = parse_body::<GroupPayload>(body)?.into_request()?;
    debug!(url = %request.questions_url, "Grouping corpus");

    let body = match state.detector.group(&request).await? {
        GroupOutcome::NotEnoughItems => GroupResponse {
            response: ANSWER_NO,
            reason: Some(REASON_NOT_ENOUGH_QUESTIONS),
            matched_groups: None,
        },
        GroupOutcome::NoGroups => GroupResponse {
            response: ANSWER_NO,
            reason: None,
            matched_groups: None,
        },
        GroupOutcome::Groups(groups) => GroupResponse {
            response: ANSWER_YES,
            reason: None,
            matched_groups: Some(groups),
        },
    };

    Ok(ok_response(body))
}
