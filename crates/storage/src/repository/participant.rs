use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Participant;

pub(crate) const PARTICIPANT_COLUMNS: &str = "participant_id, tournament_id, user_id, status, \
     final_placement, registered_at, checked_in_at";

pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List participants in registration order
    pub async fn list_for_tournament(&self, tournament_id: Uuid) -> Result<Vec<Participant>> {
        let sql = format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS}
            FROM tournament_participants
            WHERE tournament_id = $1
            ORDER BY registered_at, participant_id
            "#
        );

        let participants = sqlx::query_as::<_, Participant>(&sql)
            .bind(tournament_id)
            .fetch_all(self.pool)
            .await?;

        Ok(participants)
    }

    /// Mark the caller's registration as checked in. Checking in twice keeps
    /// the original check-in time.
    pub async fn check_in(&self, tournament_id: Uuid, user_id: Uuid) -> Result<Participant> {
        let sql = format!(
            r#"
            UPDATE tournament_participants
            SET status = 'checked_in',
                checked_in_at = COALESCE(checked_in_at, now())
            WHERE tournament_id = $1 AND user_id = $2
            RETURNING {PARTICIPANT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Participant>(&sql)
            .bind(tournament_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

pub(crate) async fn find_by_user(
    conn: &mut PgConnection,
    tournament_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Participant>> {
    let sql = format!(
        r#"
        SELECT {PARTICIPANT_COLUMNS}
        FROM tournament_participants
        WHERE tournament_id = $1 AND user_id = $2
        "#
    );

    let participant = sqlx::query_as::<_, Participant>(&sql)
        .bind(tournament_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(participant)
}
