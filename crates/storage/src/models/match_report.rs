use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Submitted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MatchReport {
    pub report_id: Uuid,
    pub match_id: Uuid,
    pub reporter_user_id: Uuid,
    pub claimed_winner_participant_id: Uuid,
    pub claimed_score1: i32,
    pub claimed_score2: i32,
    pub claimed_method: Option<String>,
    pub notes: Option<String>,
    pub proof_paths: Vec<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
