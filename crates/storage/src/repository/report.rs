use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::MatchReport;

pub(crate) const REPORT_COLUMNS: &str = "report_id, match_id, reporter_user_id, \
     claimed_winner_participant_id, claimed_score1, claimed_score2, claimed_method, notes, \
     proof_paths, status, created_at, updated_at";

pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reports submitted for a match, oldest first
    pub async fn list_for_match(&self, match_id: Uuid) -> Result<Vec<MatchReport>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM match_reports
            WHERE match_id = $1
            ORDER BY created_at, report_id
            "#
        );

        let reports = sqlx::query_as::<_, MatchReport>(&sql)
            .bind(match_id)
            .fetch_all(self.pool)
            .await?;

        Ok(reports)
    }
}
