use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{finalize_match, list_reports, submit_report};
use crate::middleware::auth::{JwtVerifier, require_auth};
use crate::state::AppState;

pub fn routes(verifier: JwtVerifier) -> Router<AppState> {
    Router::new()
        .route(
            "/:tournament_id/matches/:match_id/finalize",
            post(finalize_match),
        )
        .route(
            "/:tournament_id/matches/:match_id/report",
            get(list_reports).post(submit_report),
        )
        .route_layer(middleware::from_fn_with_state(verifier, require_auth))
}
