use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Placements, TournamentMatch, TournamentStatus};
use crate::services::bracket::Bracket;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundResponse {
    pub round_number: i32,
    pub matches: Vec<TournamentMatch>,
}

/// Bracket view of a tournament, grouped by round
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BracketResponse {
    pub tournament_id: Uuid,
    pub status: TournamentStatus,
    pub rounds: Vec<RoundResponse>,
    pub complete: bool,
    pub placements: Option<Placements>,
}

impl BracketResponse {
    pub fn new(tournament_id: Uuid, status: TournamentStatus, bracket: &Bracket) -> Self {
        let rounds = bracket
            .rounds()
            .iter()
            .enumerate()
            .map(|(index, matches)| RoundResponse {
                round_number: index as i32 + 1,
                matches: matches.clone(),
            })
            .collect();

        Self {
            tournament_id,
            status,
            rounds,
            complete: bracket.is_complete(),
            placements: bracket.placements(),
        }
    }

    /// Tournaments still in registration have no matches yet
    pub fn empty(tournament_id: Uuid, status: TournamentStatus) -> Self {
        Self {
            tournament_id,
            status,
            rounds: Vec::new(),
            complete: false,
            placements: None,
        }
    }
}
