use axum::extract::FromRef;
use storage::Database;

use crate::middleware::auth::JwtVerifier;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtVerifier,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for JwtVerifier {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
