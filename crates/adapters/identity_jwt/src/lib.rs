//! # aerotech-adapter-identity-jwt
//!
//! Verifies operator bearer tokens issued by the external identity provider.
//!
//! Tokens are HS256-signed JWTs whose `sub` claim is the operator's UUID.
//! Expiry is always checked; the audience only when one is configured.
//! Login and token issuance are out of scope: the hub only verifies.
//!
//! ## Dependency rule
//! Depends on `aerotech-app` (for the [`IdentityProvider`] port) and
//! `aerotech-domain`.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use aerotech_app::ports::IdentityProvider;
use aerotech_domain::error::{AeroTechError, AuthError};
use aerotech_domain::id::ActorId;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// [`IdentityProvider`] backed by a shared HS256 secret.
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Verify tokens signed with `secret`, optionally requiring `audience`.
    #[must_use]
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    fn verify(&self, token: &str) -> Result<ActorId, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            AuthError::InvalidCredential
        })?;
        data.claims.sub.parse::<ActorId>().map_err(|err| {
            tracing::debug!(error = %err, "token subject is not an actor id");
            AuthError::InvalidCredential
        })
    }
}

impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, credential: &str) -> Result<ActorId, AeroTechError> {
        Ok(self.verify(credential)?)
    }
}
