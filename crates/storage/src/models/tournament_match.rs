use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Completed,
    Forfeited,
}

/// One of the two participant positions of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Slot {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1"),
            Self::Two => write!(f, "2"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TournamentMatch {
    pub match_id: Uuid,
    pub tournament_id: Uuid,
    pub round_number: i32,
    pub match_number: i32,
    pub participant1_id: Option<Uuid>,
    pub participant2_id: Option<Uuid>,
    pub winner_id: Option<Uuid>,
    pub score1: i32,
    pub score2: i32,
    pub status: MatchStatus,
    pub outcome_method: Option<String>,
    pub outcome_notes: Option<String>,
    pub finalized_at: Option<DateTime<Utc>>,
    pub finalized_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TournamentMatch {
    pub fn slot(&self, slot: Slot) -> Option<Uuid> {
        match slot {
            Slot::One => self.participant1_id,
            Slot::Two => self.participant2_id,
        }
    }

    pub fn set_slot(&mut self, slot: Slot, participant_id: Option<Uuid>) {
        match slot {
            Slot::One => self.participant1_id = participant_id,
            Slot::Two => self.participant2_id = participant_id,
        }
    }

    /// True when `participant_id` occupies one of the two populated slots
    pub fn has_participant(&self, participant_id: Uuid) -> bool {
        self.participant1_id == Some(participant_id) || self.participant2_id == Some(participant_id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// The participant that did not win a completed match
    pub fn loser_id(&self) -> Option<Uuid> {
        if !self.is_completed() {
            return None;
        }

        let winner = self.winner_id?;
        if self.participant1_id == Some(winner) {
            self.participant2_id
        } else if self.participant2_id == Some(winner) {
            self.participant1_id
        } else {
            None
        }
    }
}
