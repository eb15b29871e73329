use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::RewardGrant;

const GRANT_COLUMNS: &str = "grant_id, tournament_id, placements, status, attempts, last_error, \
     next_attempt_at, created_at, dispatched_at";

/// Outbox of reward grants waiting to be delivered
pub struct RewardGrantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RewardGrantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Claim up to `limit` due grants.
    ///
    /// Claimed rows get `next_attempt_at` pushed out by `lease_secs`, so a
    /// worker that dies mid-dispatch releases them once the lease expires.
    /// `SKIP LOCKED` keeps concurrent workers from claiming the same row.
    pub async fn claim_due(&self, limit: i64, lease_secs: i64) -> Result<Vec<RewardGrant>> {
        let sql = format!(
            r#"
            UPDATE reward_grants
            SET next_attempt_at = now() + make_interval(secs => $2)
            WHERE grant_id IN (
                SELECT grant_id
                FROM reward_grants
                WHERE status = 'pending' AND next_attempt_at <= now()
                ORDER BY next_attempt_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {GRANT_COLUMNS}
            "#
        );

        let grants = sqlx::query_as::<_, RewardGrant>(&sql)
            .bind(limit)
            .bind(lease_secs as f64)
            .fetch_all(self.pool)
            .await?;

        Ok(grants)
    }

    pub async fn mark_dispatched(&self, grant_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reward_grants
            SET status = 'dispatched', dispatched_at = now(), attempts = attempts + 1, last_error = NULL
            WHERE grant_id = $1
            "#,
        )
        .bind(grant_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Record a failed attempt. `retry_at` of `None` gives up on the grant.
    pub async fn record_failure(
        &self,
        grant_id: Uuid,
        error: &str,
        retry_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reward_grants
            SET attempts = attempts + 1,
                last_error = $2,
                status = CASE WHEN $3::timestamptz IS NULL
                              THEN 'failed'::reward_grant_status
                              ELSE status END,
                next_attempt_at = COALESCE($3, next_attempt_at)
            WHERE grant_id = $1
            "#,
        )
        .bind(grant_id)
        .bind(error)
        .bind(retry_at)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
