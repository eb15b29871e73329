use sqlx::PgPool;
use storage::{
    dto::{bracket::BracketResponse, tournament::CreateTournamentRequest},
    error::Result,
    models::{Participant, Tournament},
    repository::{participant::ParticipantRepository, tournament::TournamentRepository},
    services::lifecycle,
};
use uuid::Uuid;

/// Create a tournament hosted by the caller
pub async fn create_tournament(
    pool: &PgPool,
    host_id: Uuid,
    request: &CreateTournamentRequest,
) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.create(host_id, request).await
}

/// Get tournament by id
pub async fn get_tournament(pool: &PgPool, tournament_id: Uuid) -> Result<Tournament> {
    let repo = TournamentRepository::new(pool);
    repo.find_by_id(tournament_id).await
}

/// List participants, checking the tournament exists first
pub async fn list_participants(pool: &PgPool, tournament_id: Uuid) -> Result<Vec<Participant>> {
    TournamentRepository::new(pool).find_by_id(tournament_id).await?;

    let repo = ParticipantRepository::new(pool);
    repo.list_for_tournament(tournament_id).await
}

pub async fn register(pool: &PgPool, tournament_id: Uuid, user_id: Uuid) -> Result<Participant> {
    lifecycle::register_participant(pool, tournament_id, user_id).await
}

pub async fn check_in(pool: &PgPool, tournament_id: Uuid, user_id: Uuid) -> Result<Participant> {
    lifecycle::check_in_participant(pool, tournament_id, user_id).await
}

/// Generate the bracket and return its view
pub async fn start_tournament(
    pool: &PgPool,
    tournament_id: Uuid,
    host_id: Uuid,
) -> Result<BracketResponse> {
    let bracket = lifecycle::start_tournament(pool, tournament_id, host_id).await?;
    let tournament = TournamentRepository::new(pool).find_by_id(tournament_id).await?;

    Ok(BracketResponse::new(tournament_id, tournament.status, &bracket))
}

pub async fn get_bracket(pool: &PgPool, tournament_id: Uuid) -> Result<BracketResponse> {
    lifecycle::get_bracket(pool, tournament_id).await
}
