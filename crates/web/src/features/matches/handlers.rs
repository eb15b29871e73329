use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::match_result::{
        FinalizeMatchRequest, FinalizeMatchResponse, ReportListResponse,
        ReportSubmissionResponse, SubmitReportRequest,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/matches/{match_id}/finalize",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID"),
        ("match_id" = Uuid, Path, description = "Match ID")
    ),
    request_body = FinalizeMatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Match finalized and winner advanced", body = FinalizeMatchResponse),
        (status = 400, description = "Validation error, invalid winner or match already finalized"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the tournament host"),
        (status = 404, description = "Tournament or match not found"),
        (status = 409, description = "Next-round slot already holds another participant")
    ),
    tag = "matches"
)]
pub async fn finalize_match(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiPath((tournament_id, match_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<FinalizeMatchRequest>,
) -> Result<Json<FinalizeMatchResponse>, WebError> {
    req.validate()?;

    let outcome =
        services::finalize_match(db.pool(), tournament_id, match_id, user.user_id, req).await?;

    let message = if outcome.tournament_complete {
        "Match finalized, tournament complete"
    } else {
        "Match finalized"
    };

    Ok(Json(FinalizeMatchResponse {
        message: message.to_string(),
        tournament_complete: outcome.tournament_complete,
    }))
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/matches/{match_id}/report",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID"),
        ("match_id" = Uuid, Path, description = "Match ID")
    ),
    request_body = SubmitReportRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Report submitted", body = ReportSubmissionResponse),
        (status = 200, description = "Existing report updated", body = ReportSubmissionResponse),
        (status = 400, description = "Validation error, invalid winner or match already finalized"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a participant of this match"),
        (status = 404, description = "Tournament or match not found")
    ),
    tag = "matches"
)]
pub async fn submit_report(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiPath((tournament_id, match_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<SubmitReportRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let submission =
        services::submit_report(db.pool(), tournament_id, match_id, user.user_id, &req).await?;

    let (status, message) = if submission.created {
        (StatusCode::CREATED, "Report submitted")
    } else {
        (StatusCode::OK, "Report updated")
    };

    Ok((
        status,
        Json(ReportSubmissionResponse {
            report: submission.report,
            message: message.to_string(),
        }),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/matches/{match_id}/report",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID"),
        ("match_id" = Uuid, Path, description = "Match ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Reports submitted for the match", body = ReportListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the tournament host"),
        (status = 404, description = "Tournament or match not found")
    ),
    tag = "matches"
)]
pub async fn list_reports(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiPath((tournament_id, match_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<ReportListResponse>, WebError> {
    let reports = services::list_reports(db.pool(), tournament_id, match_id, user.user_id).await?;

    Ok(Json(ReportListResponse { reports }))
}
