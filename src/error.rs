//! Error taxonomy for a route optimization attempt.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("add at least one address before optimizing")]
    NoAddresses,

    /// `position` is zero-based; the message counts from one.
    #[error("please fill in every address (entry {} is empty)", .position + 1)]
    EmptyAddress { position: usize },

    #[error("entry {index} does not exist ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("address not found: {address}")]
    NotFound { address: String },

    #[error("{service} rejected the route request: {message}")]
    Routing {
        service: &'static str,
        message: String,
    },

    #[error("could not connect to {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {service}: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },
}

/// Coarse classification surfaced to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Routing,
    Transport,
}

impl OptimizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptimizeError::NoAddresses
            | OptimizeError::EmptyAddress { .. }
            | OptimizeError::IndexOutOfRange { .. } => ErrorKind::Validation,
            OptimizeError::NotFound { .. } => ErrorKind::NotFound,
            OptimizeError::Routing { .. } => ErrorKind::Routing,
            OptimizeError::Transport { .. } | OptimizeError::Decode { .. } => ErrorKind::Transport,
        }
    }

    pub(crate) fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| OptimizeError::Transport { service, source }
    }

    pub(crate) fn routing(service: &'static str, message: impl Into<String>) -> Self {
        OptimizeError::Routing {
            service,
            message: message.into(),
        }
    }

    pub(crate) fn decode(service: &'static str, reason: impl Into<String>) -> Self {
        OptimizeError::Decode {
            service,
            reason: reason.into(),
        }
    }
}

/// Cloneable record of a failed attempt, kept in the workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&OptimizeError> for Failure {
    fn from(err: &OptimizeError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Problems building an optimizer from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVariable(&'static str),

    #[error("invalid value {value:?} for {variable}")]
    InvalidValue {
        variable: &'static str,
        value: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_variants_share_a_kind() {
        assert_eq!(OptimizeError::NoAddresses.kind(), ErrorKind::Validation);
        assert_eq!(
            OptimizeError::EmptyAddress { position: 2 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            OptimizeError::IndexOutOfRange { index: 4, len: 1 }.kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_failure_carries_rendered_message() {
        let err = OptimizeError::NotFound {
            address: "Rua Augusta 1".to_string(),
        };
        let failure = Failure::from(&err);
        assert_eq!(failure.kind, ErrorKind::NotFound);
        assert_eq!(failure.message, "address not found: Rua Augusta 1");
    }

    #[test]
    fn test_routing_message_is_surfaced() {
        let err = OptimizeError::routing("openrouteservice", "Could not find routable point");
        assert_eq!(err.kind(), ErrorKind::Routing);
        assert!(err.to_string().contains("Could not find routable point"));
    }

    #[test]
    fn test_decode_failures_count_as_transport() {
        let err = OptimizeError::decode("nominatim", "latitude is not a number");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
