//! Request authentication extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use siteround_auth::Credential;
use siteround_core::SiteroundError;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{AppState, SESSION_COOKIE};

/// The authenticated actor behind a request.
///
/// Resolving this extractor is the only place a raw credential is
/// touched; handlers receive the actor id and pass it explicitly into
/// the core operations.
pub struct Actor(pub Uuid);

/// Pull the session cookie value out of a `Cookie` header, if present.
pub fn session_cookie(parts: &Parts) -> Option<&str> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE).and_then(|rest| rest.strip_prefix('=')))
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = if let Some(jwt) = bearer_token(parts) {
            Credential::Bearer(jwt)
        } else if let Some(token) = session_cookie(parts) {
            Credential::SessionToken(token)
        } else {
            return Err(SiteroundError::Unauthenticated {
                reason: "no credentials provided".into(),
            }
            .into());
        };

        let actor = state.auth.authenticate(credential).await?;
        Ok(Actor(actor))
    }
}
