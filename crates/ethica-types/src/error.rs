use thiserror::Error;

/// Locally detected problems. Never sent to the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("conversation name is empty")]
    EmptyName,

    #[error("there is no conversation to save")]
    EmptyTranscript,

    #[error("follow-up input is no longer active")]
    StaleFollowUp,

    #[error("an exchange is already in flight")]
    ExchangeInFlight,
}

/// Errors from calls to the backend gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Non-2xx response, with the server's error description when it gave one.
    #[error("service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// The request could not complete.
    #[error("transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// The human-facing description: the server's text for service errors,
    /// the transport description otherwise.
    pub fn description(&self) -> &str {
        match self {
            GatewayError::Service { message, .. } => message,
            GatewayError::Transport(message) => message,
        }
    }
}

/// Errors surfaced by the conversation entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors from updating a parameter control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("unknown parameter: '{0}'")]
    UnknownParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::EmptyName.to_string(), "conversation name is empty");
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Service {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "service error (HTTP 429): rate limited");
        assert_eq!(err.description(), "rate limited");

        let err = GatewayError::Transport("connection refused".to_string());
        assert_eq!(err.description(), "connection refused");
    }

    #[test]
    fn test_chat_error_is_transparent() {
        let err: ChatError = ValidationError::EmptyTranscript.into();
        assert_eq!(err.to_string(), "there is no conversation to save");

        let err: ChatError = GatewayError::Transport("timed out".to_string()).into();
        assert_eq!(err.to_string(), "transport error: timed out");
    }
}
