use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::bracket::BracketResponse;
use crate::error::{Result, StorageError, TournamentError};
use crate::models::{Participant, TournamentMatch, TournamentStatus};
use crate::repository::matches::{MATCH_COLUMNS, MatchRepository};
use crate::repository::participant::{PARTICIPANT_COLUMNS, ParticipantRepository};
use crate::repository::tournament::{TournamentRepository, lock_tournament};
use crate::services::bracket::{Bracket, plan_single_elimination};

/// Register `user_id` for a tournament that is still open.
pub async fn register_participant(
    pool: &PgPool,
    tournament_id: Uuid,
    user_id: Uuid,
) -> Result<Participant> {
    let mut tx = pool.begin().await?;

    let tournament = lock_tournament(&mut tx, tournament_id).await?;
    if tournament.status != TournamentStatus::Registration {
        return Err(invalid_state("Registration is closed for this tournament"));
    }

    let registered: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tournament_participants WHERE tournament_id = $1",
    )
    .bind(tournament_id)
    .fetch_one(&mut *tx)
    .await?;

    if registered >= i64::from(tournament.max_participants) {
        return Err(invalid_state("Tournament is full"));
    }

    let sql = format!(
        r#"
        INSERT INTO tournament_participants (tournament_id, user_id)
        VALUES ($1, $2)
        RETURNING {PARTICIPANT_COLUMNS}
        "#
    );

    let participant = sqlx::query_as::<_, Participant>(&sql)
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let e = StorageError::from(e);
            if e.is_unique_violation() {
                StorageError::ConstraintViolation("Already registered for this tournament".to_string())
            } else {
                e
            }
        })?;

    tx.commit().await?;

    info!(%tournament_id, %user_id, "Participant registered");
    Ok(participant)
}

/// Check in a registered participant before the bracket is generated.
pub async fn check_in_participant(
    pool: &PgPool,
    tournament_id: Uuid,
    user_id: Uuid,
) -> Result<Participant> {
    let tournament = TournamentRepository::new(pool).find_by_id(tournament_id).await?;
    if tournament.status != TournamentStatus::Registration {
        return Err(invalid_state("Check-in is closed for this tournament"));
    }

    ParticipantRepository::new(pool)
        .check_in(tournament_id, user_id)
        .await
}

/// Generate the single-elimination bracket from checked-in participants and
/// move the tournament to `in_progress`. Host only.
pub async fn start_tournament(pool: &PgPool, tournament_id: Uuid, actor: Uuid) -> Result<Bracket> {
    let mut tx = pool.begin().await?;

    let tournament = lock_tournament(&mut tx, tournament_id).await?;
    if !tournament.is_hosted_by(actor) {
        return Err(TournamentError::Forbidden("Only the tournament host can start it").into());
    }
    if tournament.status != TournamentStatus::Registration {
        return Err(invalid_state("Tournament has already started"));
    }

    let seeds: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT participant_id
        FROM tournament_participants
        WHERE tournament_id = $1 AND status = 'checked_in'
        ORDER BY checked_in_at, registered_at, participant_id
        "#,
    )
    .bind(tournament_id)
    .fetch_all(&mut *tx)
    .await?;

    let planned = plan_single_elimination(&seeds)?;

    let insert = format!(
        r#"
        INSERT INTO tournament_matches
            (tournament_id, round_number, match_number, participant1_id, participant2_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {MATCH_COLUMNS}
        "#
    );

    let mut matches = Vec::with_capacity(planned.len());
    for m in &planned {
        let created = sqlx::query_as::<_, TournamentMatch>(&insert)
            .bind(tournament_id)
            .bind(m.round_number)
            .bind(m.match_number)
            .bind(m.participant1_id)
            .bind(m.participant2_id)
            .fetch_one(&mut *tx)
            .await?;
        matches.push(created);
    }

    sqlx::query(
        r#"
        UPDATE tournaments
        SET status = 'in_progress', started_at = now()
        WHERE tournament_id = $1
        "#,
    )
    .bind(tournament_id)
    .execute(&mut *tx)
    .await?;

    let bracket = Bracket::from_matches(matches)?;

    tx.commit().await?;

    info!(
        %tournament_id,
        participants = seeds.len(),
        rounds = bracket.round_count(),
        "Tournament started"
    );
    Ok(bracket)
}

/// Current bracket of a tournament; empty while registration is open.
pub async fn get_bracket(pool: &PgPool, tournament_id: Uuid) -> Result<BracketResponse> {
    let tournament = TournamentRepository::new(pool).find_by_id(tournament_id).await?;
    let matches = MatchRepository::new(pool)
        .list_for_tournament(tournament_id)
        .await?;

    if matches.is_empty() {
        return Ok(BracketResponse::empty(tournament_id, tournament.status));
    }

    let bracket = Bracket::from_matches(matches)?;
    Ok(BracketResponse::new(tournament_id, tournament.status, &bracket))
}

fn invalid_state(reason: &str) -> StorageError {
    TournamentError::InvalidState(reason.to_string()).into()
}
