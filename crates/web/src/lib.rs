pub mod config;
pub mod error;
pub mod extract;
pub mod features;
pub mod middleware;
pub mod rewards;
pub mod state;

use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::tournaments::handlers::create_tournament,
        features::tournaments::handlers::get_tournament,
        features::tournaments::handlers::list_participants,
        features::tournaments::handlers::register,
        features::tournaments::handlers::check_in,
        features::tournaments::handlers::start_tournament,
        features::tournaments::handlers::get_bracket,
        features::matches::handlers::finalize_match,
        features::matches::handlers::submit_report,
        features::matches::handlers::list_reports,
    ),
    components(
        schemas(
            storage::dto::tournament::CreateTournamentRequest,
            storage::dto::tournament::TournamentResponse,
            storage::dto::bracket::RoundResponse,
            storage::dto::bracket::BracketResponse,
            storage::dto::match_result::FinalizeMatchRequest,
            storage::dto::match_result::FinalizeMatchResponse,
            storage::dto::match_result::SubmitReportRequest,
            storage::dto::match_result::ReportSubmissionResponse,
            storage::dto::match_result::ReportListResponse,
            storage::models::Tournament,
            storage::models::TournamentStatus,
            storage::models::Participant,
            storage::models::ParticipantStatus,
            storage::models::TournamentMatch,
            storage::models::MatchStatus,
            storage::models::Slot,
            storage::models::MatchReport,
            storage::models::ReportStatus,
            storage::models::Placements,
        )
    ),
    tags(
        (name = "tournaments", description = "Tournament registration and lifecycle"),
        (name = "matches", description = "Match finalization and result reports"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Build the full HTTP application around `state`
pub fn app(state: AppState) -> Router {
    let api = features::tournaments::routes::routes(state.jwt.clone())
        .merge(features::matches::routes::routes(state.jwt.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .nest("/api/tournaments", api)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

async fn health(State(db): State<Database>) -> Response {
    match db.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded" })),
            )
                .into_response()
        }
    }
}
