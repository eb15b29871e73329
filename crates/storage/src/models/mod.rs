mod match_report;
mod participant;
mod placements;
mod reward_grant;
mod tournament;
mod tournament_match;

pub use match_report::{MatchReport, ReportStatus};
pub use participant::{Participant, ParticipantStatus};
pub use placements::Placements;
pub use reward_grant::{RewardGrant, RewardGrantStatus};
pub use tournament::{Tournament, TournamentStatus};
pub use tournament_match::{MatchStatus, Slot, TournamentMatch};
