use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::dto::match_result::SubmitReportRequest;
use crate::error::{Result, TournamentError};
use crate::models::{MatchReport, MatchStatus};
use crate::repository::matches::{MatchRepository, lock_in_tournament};
use crate::repository::participant::find_by_user;
use crate::repository::report::{REPORT_COLUMNS, ReportRepository};
use crate::repository::tournament::TournamentRepository;

#[derive(Debug, Clone)]
pub struct ReportSubmission {
    pub report: MatchReport,
    /// False when an earlier report by the same user was overwritten
    pub created: bool,
}

#[derive(FromRow)]
struct UpsertedReport {
    #[sqlx(flatten)]
    report: MatchReport,
    inserted: bool,
}

/// Store a participant's claimed result for a match.
///
/// One report exists per match and reporter; resubmitting replaces it. The
/// first report moves a pending match to `in_progress`; reports never
/// complete a match.
pub async fn submit_report(
    pool: &PgPool,
    tournament_id: Uuid,
    match_id: Uuid,
    reporter: Uuid,
    req: &SubmitReportRequest,
) -> Result<ReportSubmission> {
    TournamentRepository::new(pool).find_by_id(tournament_id).await?;

    let mut tx = pool.begin().await?;

    let participant = find_by_user(&mut tx, tournament_id, reporter)
        .await?
        .ok_or(TournamentError::Forbidden(
            "Only tournament participants can report results",
        ))?;

    let m = lock_in_tournament(&mut tx, tournament_id, match_id).await?;
    if !m.has_participant(participant.participant_id) {
        return Err(TournamentError::Forbidden("You are not a participant in this match").into());
    }
    if m.is_completed() {
        return Err(TournamentError::AlreadyFinalized.into());
    }
    if !m.has_participant(req.claimed_winner_participant_id) {
        return Err(TournamentError::InvalidWinner.into());
    }

    let sql = format!(
        r#"
        INSERT INTO match_reports (
            match_id, reporter_user_id, claimed_winner_participant_id,
            claimed_score1, claimed_score2, claimed_method, notes, proof_paths
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (match_id, reporter_user_id)
        DO UPDATE SET
            claimed_winner_participant_id = EXCLUDED.claimed_winner_participant_id,
            claimed_score1 = EXCLUDED.claimed_score1,
            claimed_score2 = EXCLUDED.claimed_score2,
            claimed_method = EXCLUDED.claimed_method,
            notes = EXCLUDED.notes,
            proof_paths = EXCLUDED.proof_paths,
            status = 'submitted',
            updated_at = now()
        RETURNING {REPORT_COLUMNS}, (xmax = 0) AS inserted
        "#
    );

    let upserted = sqlx::query_as::<_, UpsertedReport>(&sql)
        .bind(match_id)
        .bind(reporter)
        .bind(req.claimed_winner_participant_id)
        .bind(req.claimed_score1)
        .bind(req.claimed_score2)
        .bind(&req.claimed_method)
        .bind(&req.notes)
        .bind(req.proof_paths.clone().unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;

    if m.status == MatchStatus::Pending {
        sqlx::query(
            r#"
            UPDATE tournament_matches
            SET status = 'in_progress'
            WHERE match_id = $1 AND status = 'pending'
            "#,
        )
        .bind(match_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        %tournament_id,
        %match_id,
        %reporter,
        created = upserted.inserted,
        "Match report submitted"
    );

    Ok(ReportSubmission {
        report: upserted.report,
        created: upserted.inserted,
    })
}

/// Reports for a match, visible to the tournament host only.
pub async fn list_reports(
    pool: &PgPool,
    tournament_id: Uuid,
    match_id: Uuid,
    actor: Uuid,
) -> Result<Vec<MatchReport>> {
    let tournament = TournamentRepository::new(pool).find_by_id(tournament_id).await?;
    if !tournament.is_hosted_by(actor) {
        return Err(TournamentError::Forbidden("Only the tournament host can view reports").into());
    }

    MatchRepository::new(pool)
        .find_in_tournament(tournament_id, match_id)
        .await?;

    ReportRepository::new(pool).list_for_match(match_id).await
}
