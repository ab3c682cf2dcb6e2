use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::domain::AppState;
use crate::domain::entity::EntityRef;
use crate::domain::identifiers::SubmissionId;
use crate::domain::submission::lifecycle::WorkflowAction;
use crate::infrastructure::http::actor::Actor;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::submissions::dto::{
    OwnerRequest, RejectRequest, SubmissionResponse, WorkflowActionRequest,
};

mod dto;

type SubmissionResult = Result<ApiSuccess<SubmissionResponse>, ApiError>;

pub async fn submit<S: AppState>(
    State(state): State<S>,
    Actor(actor): Actor,
    Json(request): Json<OwnerRequest>,
) -> SubmissionResult {
    state
        .workflow()
        .submit(EntityRef::from(request), &actor)
        .await
        .map_err(ApiError::from)
        .map(|s| ApiSuccess::new(StatusCode::CREATED, s.into()))
}

pub async fn approve<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    Actor(actor): Actor,
) -> SubmissionResult {
    let id = parse_submission_id(&id)?;

    state
        .workflow()
        .approve(id, &actor)
        .await
        .map_err(ApiError::from)
        .map(|s| ApiSuccess::new(StatusCode::OK, s.into()))
}

pub async fn reject<S: AppState>(
    Path(id): Path<String>,
    State(state): State<S>,
    Actor(actor): Actor,
    request: Option<Json<RejectRequest>>,
) -> SubmissionResult {
    let id = parse_submission_id(&id)?;
    let reason = request.and_then(|Json(request)| request.reason);

    state
        .workflow()
        .reject(id, &actor, reason)
        .await
        .map_err(ApiError::from)
        .map(|s| ApiSuccess::new(StatusCode::OK, s.into()))
}

pub async fn current_submission<S: AppState>(
    Query(request): Query<OwnerRequest>,
    State(state): State<S>,
) -> Result<ApiSuccess<Option<SubmissionResponse>>, ApiError> {
    let current = state
        .workflow()
        .current_submission(&EntityRef::from(request))
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        current.map(SubmissionResponse::from),
    ))
}

pub async fn submission_history<S: AppState>(
    Query(request): Query<OwnerRequest>,
    State(state): State<S>,
) -> Result<ApiSuccess<Vec<SubmissionResponse>>, ApiError> {
    let history = state
        .workflow()
        .submission_history(&EntityRef::from(request))
        .await?
        .into_iter()
        .map(SubmissionResponse::from)
        .collect::<Vec<_>>();

    Ok(ApiSuccess::new(StatusCode::OK, history))
}

/// Single entry point for form posts carrying a `workflow-action` field
pub async fn workflow_action<S: AppState>(
    State(state): State<S>,
    Actor(actor): Actor,
    Json(request): Json<WorkflowActionRequest>,
) -> SubmissionResult {
    let workflow = state.workflow();

    match request.action {
        WorkflowAction::SaveSubmission => {
            let entry = request.entry.ok_or_else(|| {
                ApiError::UnprocessableEntity("save-submission requires an entry".to_string())
            })?;
            let submission = workflow.save_and_submit(entry.into(), &actor).await?;
            Ok(ApiSuccess::new(StatusCode::CREATED, submission.into()))
        }
        WorkflowAction::ApproveSubmission => {
            let id = required_submission_id(request.submission_id)?;
            let submission = workflow.approve(id, &actor).await?;
            Ok(ApiSuccess::new(StatusCode::OK, submission.into()))
        }
        WorkflowAction::RejectSubmission => {
            let id = required_submission_id(request.submission_id)?;
            let submission = workflow.reject(id, &actor, request.reason).await?;
            Ok(ApiSuccess::new(StatusCode::OK, submission.into()))
        }
    }
}

fn parse_submission_id(id: &str) -> Result<SubmissionId, ApiError> {
    SubmissionId::try_from(id).map_err(|err| ApiError::UnprocessableEntity(err.to_string()))
}

fn required_submission_id(id: Option<uuid::Uuid>) -> Result<SubmissionId, ApiError> {
    id.map(SubmissionId::from)
        .ok_or_else(|| ApiError::UnprocessableEntity("submissionId is required".to_string()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header};

    use super::*;

    async fn reject_body(request: Request<Body>) -> Option<Json<RejectRequest>> {
        Option::<Json<RejectRequest>>::from_request(request, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reject_body_is_optional() {
        let bare = Request::builder().method("POST").body(Body::empty()).unwrap();
        assert!(reject_body(bare).await.is_none());

        let with_reason = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"reason":"Needs sources"}"#))
            .unwrap();
        let Json(request) = reject_body(with_reason).await.unwrap();
        assert_eq!(request.reason.as_deref(), Some("Needs sources"));
    }
}
