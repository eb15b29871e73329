use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::{StorageError, TournamentError};
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, body) = match &self {
            Self::Storage(StorageError::NotFound) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Resource not found"
                }),
            ),
            Self::Storage(StorageError::ConstraintViolation(msg)) => (
                StatusCode::CONFLICT,
                json!({
                    "error": msg
                }),
            ),
            Self::Storage(StorageError::Tournament(e)) => tournament_error(e),
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "An internal error occurred"
                    }),
                )
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Validation failed",
                        "details": field_errors
                    }),
                )
            }
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": msg
                }),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Unauthorized"
                }),
            ),
        };

        (status_code, Json(body)).into_response()
    }
}

fn tournament_error(error: &TournamentError) -> (StatusCode, serde_json::Value) {
    let status_code = match error {
        TournamentError::MatchNotFound => StatusCode::NOT_FOUND,
        TournamentError::Forbidden(_) => StatusCode::FORBIDDEN,
        TournamentError::AlreadyFinalized
        | TournamentError::InvalidWinner
        | TournamentError::InvalidState(_) => StatusCode::BAD_REQUEST,
        TournamentError::SlotConflict { .. } => StatusCode::CONFLICT,
        TournamentError::MalformedBracket(_) => {
            tracing::error!("Bracket integrity error: {}", error);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "An internal error occurred"
                }),
            );
        }
    };

    (status_code, json!({ "error": error.to_string() }))
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<TournamentError> for WebError {
    fn from(error: TournamentError) -> Self {
        Self::Storage(StorageError::Tournament(error))
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(error: impl Into<WebError>) -> StatusCode {
        error.into().into_response().status()
    }

    #[test]
    fn test_tournament_errors_map_to_status_codes() {
        assert_eq!(status_of(TournamentError::Forbidden("host only")), StatusCode::FORBIDDEN);
        assert_eq!(status_of(TournamentError::MatchNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(TournamentError::AlreadyFinalized), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(TournamentError::InvalidWinner), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(TournamentError::InvalidState("Tournament is full".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(TournamentError::SlotConflict {
                match_id: Uuid::new_v4(),
                slot: storage::models::Slot::Two,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(TournamentError::MalformedBracket("gap".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_errors_map_to_status_codes() {
        assert_eq!(status_of(StorageError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StorageError::ConstraintViolation("dup".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StorageError::Database(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(WebError::Unauthorized), StatusCode::UNAUTHORIZED);
    }
}
