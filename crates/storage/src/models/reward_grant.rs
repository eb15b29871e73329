use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Placements;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reward_grant_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RewardGrantStatus {
    Pending,
    Dispatched,
    Failed,
}

#[derive(Debug, Clone, FromRow)]
pub struct RewardGrant {
    pub grant_id: Uuid,
    pub tournament_id: Uuid,
    pub placements: Json<Placements>,
    pub status: RewardGrantStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
}
