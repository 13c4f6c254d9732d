//! Bearer credential extraction.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use aerotech_app::ports::IdentityProvider;
use aerotech_domain::error::{AeroTechError, AuthError};
use aerotech_domain::id::ActorId;

/// Token following `Bearer ` in the `Authorization` header, if any.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolve the operator calling this request.
pub(crate) async fn resolve_actor<IP>(
    identity: &IP,
    headers: &HeaderMap,
) -> Result<ActorId, AeroTechError>
where
    IP: IdentityProvider + Sync,
{
    let token = bearer_token(headers).ok_or(AuthError::MissingCredential)?;
    identity.resolve(token).await
}
