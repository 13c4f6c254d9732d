//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AeroTechError`] via `#[from]`. The storage variant is boxed so the
//! domain never depends on a concrete persistence crate.

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum AeroTechError {
    /// A request or value violated a domain invariant. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller could not be identified. Nothing was written.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A looked-up record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The datastore failed. The message is the underlying storage message.
    #[error("{0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations on commands, targets, readings and devices.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown actuator `{0}`, expected `pump` or `fan`")]
    UnknownActuator(String),

    #[error("unknown mode `{0}`, expected `auto` or `manual`")]
    UnknownMode(String),

    #[error("name must not be empty")]
    EmptyName,

    #[error("secret must not be empty")]
    EmptySecret,

    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("`{0}` must be a finite number")]
    NotFinite(&'static str),

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Failures to establish who is calling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No resolved actor was supplied to an operation that requires one.
    #[error("Unauthorized")]
    MissingActor,

    /// The request carried no bearer credential.
    #[error("missing bearer credential")]
    MissingCredential,

    /// The bearer credential was rejected by the identity provider.
    #[error("invalid credential")]
    InvalidCredential,

    /// A device presented an unknown id or a wrong ingest secret.
    #[error("Unauthorized device")]
    UnauthorizedDevice,
}

/// A record looked up by id does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_surface_storage_message_verbatim() {
        let source = std::io::Error::other("disk I/O error");
        let err = AeroTechError::Storage(Box::new(source));
        assert_eq!(err.to_string(), "disk I/O error");
    }

    #[test]
    fn should_name_missing_field_in_validation_message() {
        let err: AeroTechError = ValidationError::MissingField("device_id").into();
        assert_eq!(err.to_string(), "missing required field `device_id`");
    }

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "ActuatorState",
            id: "aero-01".to_string(),
        };
        assert_eq!(err.to_string(), "ActuatorState not found: aero-01");
    }
}
