//! Single-elimination bracket progression.
//!
//! A [`Bracket`] is rebuilt from the flat match rows of a tournament and
//! indexed by `(round, position)`, where `position` is the 0-based index of a
//! match inside its round. Finalizing a match mutates the in-memory bracket
//! and reports exactly which rows changed so a store can persist them in one
//! transaction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::TournamentError;
use crate::models::{MatchStatus, Placements, Slot, TournamentMatch};

/// Where the winner of a match moves to in the next round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advancement {
    pub round: i32,
    pub position: usize,
    pub slot: Slot,
}

/// Matches `2k-1` and `2k` of round `r` feed match `k` of round `r+1`;
/// the odd-numbered match fills slot 1.
pub fn advance(round: i32, position: usize) -> Advancement {
    Advancement {
        round: round + 1,
        position: position / 2,
        slot: if position % 2 == 0 { Slot::One } else { Slot::Two },
    }
}

/// Result declared by the host when finalizing a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub winner_id: Uuid,
    pub score1: i32,
    pub score2: i32,
    pub outcome_method: String,
    pub outcome_notes: Option<String>,
}

/// A participant written into a next-round slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment {
    pub match_id: Uuid,
    pub slot: Slot,
    pub participant_id: Uuid,
}

/// Everything that changed when a match was finalized
#[derive(Debug, Clone)]
pub struct Finalization {
    pub completed: TournamentMatch,
    pub advancement: Option<SlotAssignment>,
    /// Present only when this finalization completed the tournament
    pub placements: Option<Placements>,
}

/// A match to create when a bracket is generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub round_number: i32,
    pub match_number: i32,
    pub participant1_id: Option<Uuid>,
    pub participant2_id: Option<Uuid>,
}

/// Lay out a single-elimination bracket for `participants`, in seeding order.
///
/// The participant count must be a power of two and at least 2. Round 1
/// pairs seeds `2k-2` and `2k-1` into match `k`; later rounds start empty.
pub fn plan_single_elimination(participants: &[Uuid]) -> Result<Vec<NewMatch>, TournamentError> {
    let count = participants.len();
    if count < 2 || !count.is_power_of_two() {
        return Err(TournamentError::InvalidState(format!(
            "A single-elimination bracket needs a power of two of at least 2 checked-in participants, got {count}"
        )));
    }

    let mut matches = Vec::with_capacity(count - 1);

    for (index, pair) in participants.chunks(2).enumerate() {
        matches.push(NewMatch {
            round_number: 1,
            match_number: index as i32 + 1,
            participant1_id: Some(pair[0]),
            participant2_id: Some(pair[1]),
        });
    }

    let mut round = 2;
    let mut round_size = count / 4;
    while round_size >= 1 {
        for number in 1..=round_size {
            matches.push(NewMatch {
                round_number: round,
                match_number: number as i32,
                participant1_id: None,
                participant2_id: None,
            });
        }
        round += 1;
        round_size /= 2;
    }

    Ok(matches)
}

#[derive(Debug, Clone)]
pub struct Bracket {
    rounds: Vec<Vec<TournamentMatch>>,
}

impl Bracket {
    /// Group matches by round and check the bracket shape.
    ///
    /// Rounds must be contiguous from 1, match numbers contiguous from 1
    /// within each round, each round must hold `ceil(previous / 2)` matches
    /// and the last round exactly one.
    pub fn from_matches(mut matches: Vec<TournamentMatch>) -> Result<Self, TournamentError> {
        if matches.is_empty() {
            return Err(malformed("bracket has no matches".to_string()));
        }

        matches.sort_by_key(|m| (m.round_number, m.match_number));

        let mut rounds: Vec<Vec<TournamentMatch>> = Vec::new();
        for m in matches {
            let last_round = rounds.len() as i32;
            if m.round_number == last_round + 1 {
                rounds.push(vec![m]);
            } else if m.round_number == last_round {
                if let Some(round) = rounds.last_mut() {
                    round.push(m);
                }
            } else {
                return Err(malformed(format!(
                    "round {} follows round {}",
                    m.round_number, last_round
                )));
            }
        }

        for (index, round) in rounds.iter().enumerate() {
            for (position, m) in round.iter().enumerate() {
                if m.match_number != position as i32 + 1 {
                    return Err(malformed(format!(
                        "round {} has match number {} at position {}",
                        index + 1,
                        m.match_number,
                        position + 1
                    )));
                }
            }
        }

        for pair in rounds.windows(2) {
            let expected = pair[0].len().div_ceil(2);
            if pair[1].len() != expected {
                return Err(malformed(format!(
                    "round {} has {} matches, expected {}",
                    pair[1][0].round_number,
                    pair[1].len(),
                    expected
                )));
            }
        }

        if rounds.last().map(Vec::len) != Some(1) {
            return Err(malformed("final round must hold exactly one match".to_string()));
        }

        Ok(Self { rounds })
    }

    pub fn rounds(&self) -> &[Vec<TournamentMatch>] {
        &self.rounds
    }

    pub fn round_count(&self) -> i32 {
        self.rounds.len() as i32
    }

    pub fn get(&self, round: i32, position: usize) -> Option<&TournamentMatch> {
        let index = usize::try_from(round).ok()?.checked_sub(1)?;
        self.rounds.get(index)?.get(position)
    }

    pub fn find(&self, match_id: Uuid) -> Option<&TournamentMatch> {
        self.locate(match_id)
            .map(|(index, position)| &self.rounds[index][position])
    }

    pub fn final_match(&self) -> Option<&TournamentMatch> {
        self.rounds.last()?.first()
    }

    pub fn is_complete(&self) -> bool {
        self.final_match().is_some_and(TournamentMatch::is_completed)
    }

    /// Record `result` on a match and move the winner into the next round.
    ///
    /// On error the bracket is left untouched.
    pub fn finalize(
        &mut self,
        match_id: Uuid,
        result: &MatchResult,
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Finalization, TournamentError> {
        let (round_index, position) = self
            .locate(match_id)
            .ok_or(TournamentError::MatchNotFound)?;

        let current = &self.rounds[round_index][position];
        if current.is_completed() {
            return Err(TournamentError::AlreadyFinalized);
        }
        if current.participant1_id.is_none() || current.participant2_id.is_none() {
            return Err(TournamentError::InvalidState(
                "Match is still waiting for an opponent".to_string(),
            ));
        }
        if !current.has_participant(result.winner_id) {
            return Err(TournamentError::InvalidWinner);
        }

        let advancement = match self.rounds.get(round_index + 1) {
            Some(next_round) => {
                let next = advance(current.round_number, position);
                let target = next_round.get(next.position).ok_or_else(|| {
                    malformed(format!(
                        "round {} has no match at position {}",
                        next.round,
                        next.position + 1
                    ))
                })?;

                if target.is_completed() {
                    return Err(TournamentError::InvalidState(format!(
                        "round {} match {} is already finalized",
                        target.round_number, target.match_number
                    )));
                }

                if let Some(existing) = target.slot(next.slot)
                    && existing != result.winner_id
                {
                    return Err(TournamentError::SlotConflict {
                        match_id: target.match_id,
                        slot: next.slot,
                    });
                }

                Some((
                    next.position,
                    SlotAssignment {
                        match_id: target.match_id,
                        slot: next.slot,
                        participant_id: result.winner_id,
                    },
                ))
            }
            None => None,
        };

        let completed = {
            let m = &mut self.rounds[round_index][position];
            m.winner_id = Some(result.winner_id);
            m.score1 = result.score1;
            m.score2 = result.score2;
            m.outcome_method = Some(result.outcome_method.clone());
            m.outcome_notes = result.outcome_notes.clone();
            m.status = MatchStatus::Completed;
            m.finalized_at = Some(now);
            m.finalized_by = Some(actor);
            m.clone()
        };

        if let Some((next_position, assignment)) = &advancement {
            self.rounds[round_index + 1][*next_position]
                .set_slot(assignment.slot, Some(assignment.participant_id));
        }

        Ok(Finalization {
            completed,
            advancement: advancement.map(|(_, assignment)| assignment),
            placements: self.placements(),
        })
    }

    /// Standings once the final is completed.
    ///
    /// 1st and 2nd come from the final. 3rd is the semifinal loser knocked
    /// out by the champion; every other semifinal loser shares 4th.
    pub fn placements(&self) -> Option<Placements> {
        let final_match = self.final_match()?;
        if !final_match.is_completed() {
            return None;
        }

        let first = final_match.winner_id?;
        let second = final_match.loser_id()?;

        let mut third = None;
        let mut fourth = Vec::new();

        if self.rounds.len() >= 2 {
            let semifinals = &self.rounds[self.rounds.len() - 2];
            for semifinal in semifinals {
                let Some(loser) = semifinal.loser_id() else {
                    continue;
                };
                if third.is_none() && semifinal.winner_id == Some(first) {
                    third = Some(loser);
                } else {
                    fourth.push(loser);
                }
            }
        }

        Some(Placements {
            first,
            second,
            third,
            fourth,
        })
    }

    fn locate(&self, match_id: Uuid) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(index, round)| {
            round
                .iter()
                .position(|m| m.match_id == match_id)
                .map(|position| (index, position))
        })
    }
}

fn malformed(reason: String) -> TournamentError {
    TournamentError::MalformedBracket(reason)
}
