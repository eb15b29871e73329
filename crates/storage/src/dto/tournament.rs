use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Tournament, TournamentStatus};

/// Request payload for creating a new tournament
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTournamentRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(range(
        min = 2,
        max = 256,
        message = "Max participants must be between 2 and 256"
    ))]
    pub max_participants: i32,
}

/// Response containing tournament details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub tournament_id: Uuid,
    pub name: String,
    pub host_id: Uuid,
    pub max_participants: i32,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Tournament> for TournamentResponse {
    fn from(tournament: Tournament) -> Self {
        Self {
            tournament_id: tournament.tournament_id,
            name: tournament.name,
            host_id: tournament.host_id,
            max_participants: tournament.max_participants,
            status: tournament.status,
            created_at: tournament.created_at,
            started_at: tournament.started_at,
            completed_at: tournament.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_bounds() {
        let valid = CreateTournamentRequest {
            name: "Friday Cup".to_string(),
            max_participants: 16,
        };
        assert!(valid.validate().is_ok());

        let too_small = CreateTournamentRequest {
            max_participants: 1,
            ..valid.clone()
        };
        assert!(too_small.validate().is_err());

        let unnamed = CreateTournamentRequest {
            name: String::new(),
            ..valid
        };
        let errors = unnamed.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
