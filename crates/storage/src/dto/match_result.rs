use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::MatchReport;
use crate::services::bracket::MatchResult;

const OUTCOME_METHODS: &[&str] = &[
    "score",
    "forfeit",
    "disqualification",
    "no_show",
    "admin_decision",
];

/// Request payload for the host's definitive match result
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FinalizeMatchRequest {
    pub winner_id: Uuid,

    #[validate(range(min = 0, max = 9999, message = "Score must be between 0 and 9999"))]
    pub score1: i32,

    #[validate(range(min = 0, max = 9999, message = "Score must be between 0 and 9999"))]
    pub score2: i32,

    #[validate(custom(function = "validate_outcome_method"))]
    pub outcome_method: String,

    #[validate(length(max = 2000))]
    pub outcome_notes: Option<String>,
}

impl From<FinalizeMatchRequest> for MatchResult {
    fn from(req: FinalizeMatchRequest) -> Self {
        Self {
            winner_id: req.winner_id,
            score1: req.score1,
            score2: req.score2,
            outcome_method: req.outcome_method,
            outcome_notes: req.outcome_notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FinalizeMatchResponse {
    pub message: String,
    pub tournament_complete: bool,
}

/// Request payload for a participant's claimed match result
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReportRequest {
    pub claimed_winner_participant_id: Uuid,

    #[validate(range(min = 0, max = 9999, message = "Score must be between 0 and 9999"))]
    pub claimed_score1: i32,

    #[validate(range(min = 0, max = 9999, message = "Score must be between 0 and 9999"))]
    pub claimed_score2: i32,

    #[validate(custom(function = "validate_outcome_method"))]
    pub claimed_method: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,

    #[validate(length(max = 10, message = "At most 10 proof files can be attached"))]
    pub proof_paths: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSubmissionResponse {
    pub report: MatchReport,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<MatchReport>,
}

fn validate_outcome_method(method: &str) -> Result<(), validator::ValidationError> {
    if OUTCOME_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_outcome_method"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalize_request() -> FinalizeMatchRequest {
        FinalizeMatchRequest {
            winner_id: Uuid::new_v4(),
            score1: 2,
            score2: 0,
            outcome_method: "score".to_string(),
            outcome_notes: None,
        }
    }

    #[test]
    fn test_finalize_request_accepts_known_methods() {
        for method in OUTCOME_METHODS {
            let req = FinalizeMatchRequest {
                outcome_method: method.to_string(),
                ..finalize_request()
            };
            assert!(req.validate().is_ok(), "{method} should be accepted");
        }
    }

    #[test]
    fn test_finalize_request_rejects_unknown_method_and_negative_score() {
        let req = FinalizeMatchRequest {
            outcome_method: "coin_flip".to_string(),
            score1: -1,
            ..finalize_request()
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("outcome_method"));
        assert!(fields.contains_key("score1"));
    }

    #[test]
    fn test_report_request_optional_fields() {
        let req = SubmitReportRequest {
            claimed_winner_participant_id: Uuid::new_v4(),
            claimed_score1: 1,
            claimed_score2: 3,
            claimed_method: None,
            notes: None,
            proof_paths: None,
        };
        assert!(req.validate().is_ok());

        let too_many_proofs = SubmitReportRequest {
            proof_paths: Some(vec!["shot.png".to_string(); 11]),
            claimed_method: Some("teleport".to_string()),
            ..req
        };
        let errors = too_many_proofs.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("proof_paths"));
        assert!(errors.field_errors().contains_key("claimed_method"));
    }

    #[test]
    fn test_finalize_request_converts_into_result() {
        let req = finalize_request();
        let winner = req.winner_id;
        let result = MatchResult::from(req);

        assert_eq!(result.winner_id, winner);
        assert_eq!(result.outcome_method, "score");
    }
}
