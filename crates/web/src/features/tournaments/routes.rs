use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{
    check_in, create_tournament, get_bracket, get_tournament, list_participants, register,
    start_tournament,
};
use crate::middleware::auth::{JwtVerifier, require_auth};
use crate::state::AppState;

pub fn routes(verifier: JwtVerifier) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_tournament))
        .route("/:tournament_id/participants", post(register))
        .route("/:tournament_id/participants/check-in", post(check_in))
        .route("/:tournament_id/start", post(start_tournament))
        .route_layer(middleware::from_fn_with_state(verifier, require_auth));

    Router::new()
        .route("/:tournament_id", get(get_tournament))
        .route("/:tournament_id/participants", get(list_participants))
        .route("/:tournament_id/bracket", get(get_bracket))
        .merge(protected)
}
