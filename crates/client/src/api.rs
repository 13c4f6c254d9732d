//! HTTP client for the hub's command gateway.

use reqwest::{Response, StatusCode};
use serde::Deserialize;

use aerotech_domain::actuator_state::ActuatorState;
use aerotech_domain::command::ActuatorCommand;

use crate::endpoint::resolve_endpoint;
use crate::panel::ActuatorPanel;

/// Error returned by [`CommandClient::send`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The hub answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ClientError {
    /// Status of a rejected command, if the hub answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(err) => err.status(),
            Self::Rejected { status, .. } => Some(*status),
        }
    }
}

/// What the hub answered to an accepted command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandOutcome {
    /// The row as written by this command.
    pub state: ActuatorState,
    /// Set when the state was committed but the audit entry was not.
    #[serde(default)]
    pub log_warning: Option<String>,
}

/// JSON error body returned by the hub on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turn a non-2xx response into [`ClientError::Rejected`].
async fn check_response(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {status}"),
    };
    Err(ClientError::Rejected { status, message })
}

/// Sends actuator commands on behalf of one signed-in operator.
///
/// Commands are sent once; a rejected command is reported, never retried.
#[derive(Debug, Clone)]
pub struct CommandClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl CommandClient {
    /// Client for the hub at `base`, authenticating with the bearer `token`.
    pub fn new(base: &str, token: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base, token)
    }

    /// Same as [`new`](Self::new) but reusing an existing connection pool.
    pub fn with_http(http: reqwest::Client, base: &str, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: resolve_endpoint(base),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one command and return the row the hub wrote.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] carrying the hub's `error` message
    /// on any non-2xx answer, or [`ClientError::Http`] when the hub cannot be
    /// reached or the answer cannot be decoded.
    #[tracing::instrument(skip(self, command), fields(device_id = %command.device_id, actuator = %command.actuator))]
    pub async fn send(&self, command: &ActuatorCommand) -> Result<CommandOutcome, ClientError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(command)
            .send()
            .await?;
        let outcome: CommandOutcome = check_response(resp).await?.json().await?;
        if let Some(warning) = &outcome.log_warning {
            tracing::warn!(%warning, "command applied without audit entry");
        }
        Ok(outcome)
    }

    /// Send `commands` in order and report every answer to `panel`.
    pub async fn dispatch(&self, panel: &mut ActuatorPanel, commands: Vec<ActuatorCommand>) {
        for command in commands {
            match self.send(&command).await {
                Ok(outcome) => panel.command_succeeded(&outcome),
                Err(err) => panel.command_failed(err.to_string()),
            }
        }
    }
}
