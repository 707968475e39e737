use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure class, used for diagnostics and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum EstimateError {
    /// The form was incomplete or out of range; caught before any network
    /// traffic is issued.
    #[error("form is incomplete: missing {missing:?}")]
    Validation { missing: Vec<&'static str> },

    /// Transport failure, deadline expiry, or a non-success HTTP status from
    /// the webhook.
    #[error("webhook request failed: {reason}")]
    Network { status: Option<u16>, reason: String },

    /// The webhook answered 2xx but the body did not decode into the
    /// expected estimate shape.
    #[error("malformed estimate response: {reason}")]
    MalformedResponse { reason: String },
}

impl EstimateError {
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            status: None,
            reason: reason.into(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        Self::Network {
            status: Some(status),
            reason: format!("webhook returned http status {status}"),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }
}

/// Raised when parsing a categorical form value from free text.
#[derive(Debug, Clone, Error)]
#[error("unknown {category} '{value}', expected one of: {}", .choices.join(", "))]
pub struct UnknownChoiceError {
    pub category: &'static str,
    pub value: String,
    pub choices: Vec<&'static str>,
}

impl UnknownChoiceError {
    pub fn new(category: &'static str, value: impl Into<String>, choices: &[&'static str]) -> Self {
        Self {
            category,
            value: value.into(),
            choices: choices.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_kinds() {
        assert_eq!(
            EstimateError::http_status(500).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            EstimateError::malformed("missing costSummary").kind(),
            ErrorKind::MalformedResponse
        );
    }

    #[test]
    fn network_status_is_carried() {
        match EstimateError::http_status(503) {
            EstimateError::Network { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
