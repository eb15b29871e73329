use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::tournament::CreateTournamentRequest;
use crate::error::{Result, StorageError};
use crate::models::Tournament;

pub(crate) const TOURNAMENT_COLUMNS: &str = "tournament_id, name, host_id, max_participants, \
     status, created_at, started_at, completed_at";

/// Repository for Tournament database operations
pub struct TournamentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TournamentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a tournament hosted by `host_id`
    pub async fn create(&self, host_id: Uuid, req: &CreateTournamentRequest) -> Result<Tournament> {
        let sql = format!(
            r#"
            INSERT INTO tournaments (name, host_id, max_participants)
            VALUES ($1, $2, $3)
            RETURNING {TOURNAMENT_COLUMNS}
            "#
        );

        let tournament = sqlx::query_as::<_, Tournament>(&sql)
            .bind(&req.name)
            .bind(host_id)
            .bind(req.max_participants)
            .fetch_one(self.pool)
            .await?;

        Ok(tournament)
    }

    /// Get a tournament by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Tournament> {
        let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1");

        sqlx::query_as::<_, Tournament>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

/// Lock the tournament row for the rest of the transaction.
///
/// Every write that changes bracket state takes this lock first, which
/// serializes finalizations and starts of the same tournament.
pub(crate) async fn lock_tournament(conn: &mut PgConnection, id: Uuid) -> Result<Tournament> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE tournament_id = $1 FOR UPDATE"
    );

    sqlx::query_as::<_, Tournament>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StorageError::NotFound)
}
