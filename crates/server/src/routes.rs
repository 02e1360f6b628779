use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use proposey_agent::runtime::{ProposalOutcome, ProposalRuntime};
use proposey_core::audit::ProposalLogRecord;
use proposey_core::domain::customer::ProposalRequest;
use proposey_core::errors::{ApplicationError, DomainError, InterfaceError};
use proposey_db::{ProposalLogRepository, DEFAULT_RECENT_LIMIT};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    runtime: Arc<ProposalRuntime>,
    history: Arc<dyn ProposalLogRepository>,
}

impl ApiState {
    pub fn new(runtime: Arc<ProposalRuntime>, history: Arc<dyn ProposalLogRepository>) -> Self {
        Self { runtime, history }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

/// Maps interface errors onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.user_message().to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/proposals", post(create_proposal))
        .route("/api/v1/proposals/recent", get(recent_proposals))
        .route("/api/v1/proposals/by-email", get(proposals_by_email))
        .with_state(state)
}

async fn create_proposal(
    State(state): State<ApiState>,
    body: Result<Json<ProposalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProposalOutcome>), ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(request) = body.map_err(|rejection| {
        warn!(
            event_name = "api.proposals.invalid_body",
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "proposal request body rejected"
        );
        ApiError(
            ApplicationError::from(DomainError::InvariantViolation(rejection.body_text()))
                .into_interface(correlation_id.clone()),
        )
    })?;

    info!(
        event_name = "api.proposals.create.started",
        correlation_id = %correlation_id,
        event_type = %request.event.event_type,
        "creating proposal"
    );

    match state.runtime.create_proposal(&request, &correlation_id).await {
        Ok(outcome) => Ok((StatusCode::CREATED, Json(outcome))),
        Err(error) => {
            warn!(
                event_name = "api.proposals.create.failed",
                correlation_id = %correlation_id,
                stage = error.stage(),
                error = %error,
                "proposal creation failed"
            );
            Err(ApiError(ApplicationError::from(error).into_interface(correlation_id)))
        }
    }
}

async fn recent_proposals(
    State(state): State<ApiState>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<ProposalLogRecord>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    match state.history.recent_proposals(limit).await {
        Ok(records) => Json(records),
        Err(error) => {
            warn!(
                event_name = "api.proposals.recent.failed",
                correlation_id = "history",
                error = %error,
                "failed to load recent proposals; returning empty list"
            );
            Json(Vec::new())
        }
    }
}

async fn proposals_by_email(
    State(state): State<ApiState>,
    Query(query): Query<EmailQuery>,
) -> Json<Vec<ProposalLogRecord>> {
    match state.history.find_by_email(query.email.trim()).await {
        Ok(records) => Json(records),
        Err(error) => {
            warn!(
                event_name = "api.proposals.by_email.failed",
                correlation_id = "history",
                error = %error,
                "failed to load proposals by email; returning empty list"
            );
            Json(Vec::new())
        }
    }
}
