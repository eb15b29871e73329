use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::TournamentMatch;

pub(crate) const MATCH_COLUMNS: &str = "match_id, tournament_id, round_number, match_number, \
     participant1_id, participant2_id, winner_id, score1, score2, status, outcome_method, \
     outcome_notes, finalized_at, finalized_by, created_at";

/// Repository for tournament match reads
pub struct MatchRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MatchRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All matches of a tournament ordered by round then match number
    pub async fn list_for_tournament(&self, tournament_id: Uuid) -> Result<Vec<TournamentMatch>> {
        let mut conn = self.pool.acquire().await?;
        list_for_tournament(&mut conn, tournament_id).await
    }

    pub async fn find_in_tournament(
        &self,
        tournament_id: Uuid,
        match_id: Uuid,
    ) -> Result<TournamentMatch> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS} FROM tournament_matches WHERE tournament_id = $1 AND match_id = $2"
        );

        sqlx::query_as::<_, TournamentMatch>(&sql)
            .bind(tournament_id)
            .bind(match_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

pub(crate) async fn list_for_tournament(
    conn: &mut PgConnection,
    tournament_id: Uuid,
) -> Result<Vec<TournamentMatch>> {
    let sql = format!(
        r#"
        SELECT {MATCH_COLUMNS}
        FROM tournament_matches
        WHERE tournament_id = $1
        ORDER BY round_number, match_number
        "#
    );

    let matches = sqlx::query_as::<_, TournamentMatch>(&sql)
        .bind(tournament_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(matches)
}

/// Lock a single match row of a tournament
pub(crate) async fn lock_in_tournament(
    conn: &mut PgConnection,
    tournament_id: Uuid,
    match_id: Uuid,
) -> Result<TournamentMatch> {
    let sql = format!(
        r#"
        SELECT {MATCH_COLUMNS}
        FROM tournament_matches
        WHERE tournament_id = $1 AND match_id = $2
        FOR UPDATE
        "#
    );

    sqlx::query_as::<_, TournamentMatch>(&sql)
        .bind(tournament_id)
        .bind(match_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StorageError::NotFound)
}
