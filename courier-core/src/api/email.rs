//! Email dispatch endpoints
//!
//! A body that is missing or fails to parse is treated as an absent request,
//! which the service reports as a client error like any other failure.

use crate::domain::{DispatchOutcome, DispatchResponse, EmailRequest};
use crate::state::HasServices;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

fn accepted<T>(payload: Result<Json<T>, JsonRejection>) -> Option<T> {
    match payload {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable email request body");
            None
        }
    }
}

fn respond(outcome: DispatchOutcome) -> (StatusCode, Json<DispatchResponse>) {
    (outcome.status_code(), Json(outcome.into()))
}

/// Send one templated email
#[utoipa::path(
    post,
    path = "/api/email/single/send",
    tag = "Email",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Email accepted by the provider", body = DispatchResponse),
        (status = 400, description = "Request could not be resolved or sent", body = DispatchResponse),
        (status = 500, description = "Provider failure", body = DispatchResponse)
    )
)]
pub async fn send_single<S: HasServices>(
    State(state): State<S>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> (StatusCode, Json<DispatchResponse>) {
    let request = accepted(payload);
    let outcome = state.email_service().send_email(request.as_ref()).await;
    respond(outcome)
}

/// Send a batch of templated emails in order
#[utoipa::path(
    post,
    path = "/api/email/multiple/send",
    tag = "Email",
    request_body = Vec<EmailRequest>,
    responses(
        (status = 200, description = "Every request was attempted", body = DispatchResponse),
        (status = 400, description = "Batch aborted", body = DispatchResponse)
    )
)]
pub async fn send_multiple<S: HasServices>(
    State(state): State<S>,
    payload: Result<Json<Vec<EmailRequest>>, JsonRejection>,
) -> (StatusCode, Json<DispatchResponse>) {
    let requests = accepted(payload);
    let outcome = state.email_service().send_emails(requests.as_deref()).await;
    respond(outcome)
}
