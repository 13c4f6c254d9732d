//! Identity port: turns a bearer credential into an actor.
//!
//! Issuing credentials (login, sessions) belongs to the external identity
//! provider; the hub only verifies what it is handed.

use std::future::Future;

use aerotech_domain::error::AeroTechError;
use aerotech_domain::id::ActorId;

/// Resolves bearer credentials issued by the identity provider.
pub trait IdentityProvider {
    /// Resolve `credential` (the token after `Bearer `) to the actor it names.
    ///
    /// Implementations return [`AuthError::InvalidCredential`] for tokens
    /// they cannot verify.
    ///
    /// [`AuthError::InvalidCredential`]: aerotech_domain::error::AuthError::InvalidCredential
    fn resolve(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<ActorId, AeroTechError>> + Send;
}

impl<T: IdentityProvider + Send + Sync> IdentityProvider for std::sync::Arc<T> {
    fn resolve(
        &self,
        credential: &str,
    ) -> impl Future<Output = Result<ActorId, AeroTechError>> + Send {
        (**self).resolve(credential)
    }
}
