use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, StorageError, TournamentError};
use crate::models::{Placements, Slot, TournamentMatch};
use crate::repository::matches::list_for_tournament;
use crate::repository::tournament::lock_tournament;
use crate::services::bracket::{Bracket, MatchResult, SlotAssignment};

#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    pub tournament_complete: bool,
    pub placements: Option<Placements>,
}

/// Record the host's result for a match, advance the winner and, when the
/// final is decided, persist placements and queue the reward grant.
///
/// All writes share one transaction holding the tournament row lock, so two
/// hosts finalizing sibling matches are applied one after the other.
pub async fn finalize_match(
    pool: &PgPool,
    tournament_id: Uuid,
    match_id: Uuid,
    actor: Uuid,
    result: &MatchResult,
) -> Result<FinalizeOutcome> {
    let mut tx = pool.begin().await?;

    let tournament = lock_tournament(&mut tx, tournament_id).await?;
    if !tournament.is_hosted_by(actor) {
        return Err(
            TournamentError::Forbidden("Only the tournament host can finalize matches").into(),
        );
    }

    let matches = list_for_tournament(&mut tx, tournament_id).await?;
    if !matches.iter().any(|m| m.match_id == match_id) {
        return Err(StorageError::NotFound);
    }

    let mut bracket = Bracket::from_matches(matches)?;
    let finalization = bracket.finalize(match_id, result, actor, Utc::now())?;

    store_completed_match(&mut tx, &finalization.completed).await?;

    if let Some(assignment) = finalization.advancement {
        store_slot(&mut tx, assignment).await?;
    }

    if let Some(placements) = &finalization.placements {
        complete_tournament(&mut tx, tournament_id, placements).await?;
    }

    tx.commit().await?;

    info!(
        %tournament_id,
        %match_id,
        winner_id = %result.winner_id,
        "Match finalized"
    );

    if finalization.placements.is_some() {
        info!(%tournament_id, "Tournament completed");
    }

    Ok(FinalizeOutcome {
        tournament_complete: finalization.placements.is_some(),
        placements: finalization.placements,
    })
}

async fn store_completed_match(conn: &mut PgConnection, m: &TournamentMatch) -> Result<()> {
    let updated = sqlx::query(
        r#"
        UPDATE tournament_matches
        SET winner_id = $2,
            score1 = $3,
            score2 = $4,
            outcome_method = $5,
            outcome_notes = $6,
            status = 'completed',
            finalized_at = $7,
            finalized_by = $8
        WHERE match_id = $1 AND status <> 'completed'
        "#,
    )
    .bind(m.match_id)
    .bind(m.winner_id)
    .bind(m.score1)
    .bind(m.score2)
    .bind(&m.outcome_method)
    .bind(&m.outcome_notes)
    .bind(m.finalized_at)
    .bind(m.finalized_by)
    .execute(&mut *conn)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(TournamentError::AlreadyFinalized.into());
    }

    Ok(())
}

async fn store_slot(conn: &mut PgConnection, assignment: SlotAssignment) -> Result<()> {
    let column = match assignment.slot {
        Slot::One => "participant1_id",
        Slot::Two => "participant2_id",
    };

    let sql = format!(
        r#"
        UPDATE tournament_matches
        SET {column} = $2
        WHERE match_id = $1 AND ({column} IS NULL OR {column} = $2)
        "#
    );

    let updated = sqlx::query(&sql)
        .bind(assignment.match_id)
        .bind(assignment.participant_id)
        .execute(&mut *conn)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(TournamentError::SlotConflict {
            match_id: assignment.match_id,
            slot: assignment.slot,
        }
        .into());
    }

    Ok(())
}

async fn complete_tournament(
    conn: &mut PgConnection,
    tournament_id: Uuid,
    placements: &Placements,
) -> Result<()> {
    for (participant_id, placement) in placements.assignments() {
        sqlx::query(
            r#"
            UPDATE tournament_participants
            SET final_placement = $3
            WHERE tournament_id = $1 AND participant_id = $2
            "#,
        )
        .bind(tournament_id)
        .bind(participant_id)
        .bind(placement)
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query(
        r#"
        UPDATE tournaments
        SET status = 'completed', completed_at = now()
        WHERE tournament_id = $1
        "#,
    )
    .bind(tournament_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO reward_grants (tournament_id, placements)
        VALUES ($1, $2)
        ON CONFLICT (tournament_id) DO NOTHING
        "#,
    )
    .bind(tournament_id)
    .bind(Json(placements))
    .execute(&mut *conn)
    .await?;

    Ok(())
}
