use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        bracket::BracketResponse,
        tournament::{CreateTournamentRequest, TournamentResponse},
    },
    models::Participant,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::auth::AuthUser;

use super::services;

#[utoipa::path(
    post,
    path = "/api/tournaments",
    request_body = CreateTournamentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Tournament created with the caller as host", body = TournamentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tournaments"
)]
pub async fn create_tournament(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiJson(req): ApiJson<CreateTournamentRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let tournament = services::create_tournament(db.pool(), user.user_id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(TournamentResponse::from(tournament)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Tournament found", body = TournamentResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_tournament(
    State(db): State<Database>,
    ApiPath(tournament_id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let tournament = services::get_tournament(db.pool(), tournament_id).await?;

    Ok(Json(TournamentResponse::from(tournament)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/participants",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Participants in registration order, with final placements once decided", body = Vec<Participant>),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn list_participants(
    State(db): State<Database>,
    ApiPath(tournament_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Participant>>, WebError> {
    let participants = services::list_participants(db.pool(), tournament_id).await?;

    Ok(Json(participants))
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/participants",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Caller registered", body = Participant),
        (status = 400, description = "Registration closed or tournament full"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found"),
        (status = 409, description = "Already registered")
    ),
    tag = "tournaments"
)]
pub async fn register(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiPath(tournament_id): ApiPath<Uuid>,
) -> Result<Response, WebError> {
    let participant = services::register(db.pool(), tournament_id, user.user_id).await?;

    Ok((StatusCode::CREATED, Json(participant)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/participants/check-in",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller checked in", body = Participant),
        (status = 400, description = "Check-in closed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tournament not found or caller not registered")
    ),
    tag = "tournaments"
)]
pub async fn check_in(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiPath(tournament_id): ApiPath<Uuid>,
) -> Result<Json<Participant>, WebError> {
    let participant = services::check_in(db.pool(), tournament_id, user.user_id).await?;

    Ok(Json(participant))
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/start",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Bracket generated from checked-in participants", body = BracketResponse),
        (status = 400, description = "Already started or checked-in count is not a power of two"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn start_tournament(
    Extension(user): Extension<AuthUser>,
    State(db): State<Database>,
    ApiPath(tournament_id): ApiPath<Uuid>,
) -> Result<Json<BracketResponse>, WebError> {
    let bracket = services::start_tournament(db.pool(), tournament_id, user.user_id).await?;

    Ok(Json(bracket))
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/bracket",
    params(
        ("tournament_id" = Uuid, Path, description = "Tournament ID")
    ),
    responses(
        (status = 200, description = "Matches grouped by round, with placements once complete", body = BracketResponse),
        (status = 404, description = "Tournament not found")
    ),
    tag = "tournaments"
)]
pub async fn get_bracket(
    State(db): State<Database>,
    ApiPath(tournament_id): ApiPath<Uuid>,
) -> Result<Json<BracketResponse>, WebError> {
    let bracket = services::get_bracket(db.pool(), tournament_id).await?;

    Ok(Json(bracket))
}
