use sqlx::PgPool;
use storage::{
    dto::match_result::{FinalizeMatchRequest, SubmitReportRequest},
    error::Result,
    models::MatchReport,
    services::{
        bracket::MatchResult,
        finalization::{self, FinalizeOutcome},
        reporting::{self, ReportSubmission},
    },
};
use uuid::Uuid;

/// Finalize a match as the tournament host
pub async fn finalize_match(
    pool: &PgPool,
    tournament_id: Uuid,
    match_id: Uuid,
    host_id: Uuid,
    request: FinalizeMatchRequest,
) -> Result<FinalizeOutcome> {
    let result = MatchResult::from(request);
    finalization::finalize_match(pool, tournament_id, match_id, host_id, &result).await
}

/// Create or replace the caller's report for a match
pub async fn submit_report(
    pool: &PgPool,
    tournament_id: Uuid,
    match_id: Uuid,
    reporter: Uuid,
    request: &SubmitReportRequest,
) -> Result<ReportSubmission> {
    reporting::submit_report(pool, tournament_id, match_id, reporter, request).await
}

pub async fn list_reports(
    pool: &PgPool,
    tournament_id: Uuid,
    match_id: Uuid,
    host_id: Uuid,
) -> Result<Vec<MatchReport>> {
    reporting::list_reports(pool, tournament_id, match_id, host_id).await
}
