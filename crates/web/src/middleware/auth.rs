use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::WebError;

/// Claims carried by the access tokens this service accepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub sub: Uuid,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Caller identity injected into request extensions by [`require_auth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Verifies HS256 bearer tokens signed with the shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    inner: Arc<VerifierInner>,
}

struct VerifierInner {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            inner: Arc::new(VerifierInner {
                key: DecodingKey::from_secret(secret.as_bytes()),
                validation,
            }),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.inner.key, &self.inner.validation)?;
        Ok(data.claims)
    }
}

pub async fn require_auth(
    State(verifier): State<JwtVerifier>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(WebError::Unauthorized)?;

    let claims = verifier.verify(token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        WebError::Unauthorized
    })?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token_for(user_id: Uuid, secret: &str, expires_in: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + expires_in).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_accepts_valid_token() {
        let user_id = Uuid::new_v4();
        let verifier = JwtVerifier::new(SECRET, None);

        let claims = verifier
            .verify(&token_for(user_id, SECRET, Duration::minutes(5)))
            .unwrap();

        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let verifier = JwtVerifier::new(SECRET, None);
        let token = token_for(Uuid::new_v4(), "other-secret", Duration::minutes(5));

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let verifier = JwtVerifier::new(SECRET, None);
        let token = token_for(Uuid::new_v4(), SECRET, Duration::hours(-2));

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_enforces_configured_audience() {
        let verifier = JwtVerifier::new(SECRET, Some("authenticated"));
        let token = token_for(Uuid::new_v4(), SECRET, Duration::minutes(5));

        // Token carries no `aud` claim
        assert!(verifier.verify(&token).is_err());
    }
}
