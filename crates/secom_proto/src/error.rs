//! Validation failures and the interface boundary error.
//!
//! Validation is the only error category the protocol structures: a
//! rejected submission names the offending field so the caller can
//! correct and resubmit. Everything a collaborator fails with (store,
//! transport) is opaque at this boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A structurally invalid acknowledgement submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {0} must not be empty")]
    EmptyField(&'static str),

    #[error("unrecognised acknowledgement kind: {0}")]
    UnknownAckKind(String),

    #[error("no delivered object for reference {0}")]
    UnknownReference(String),
}

impl ValidationError {
    /// The request field the failure is about.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) | Self::EmptyField(field) => field,
            Self::UnknownAckKind(_) => "kind",
            Self::UnknownReference(_) => "reference",
        }
    }
}

/// Errors surfaced by [`AcknowledgementInterface`] implementations.
///
/// Transports map these to status codes: `Validation` and `Policy` are
/// caller-correctable rejections, `Internal` is a receiver-side fault.
///
/// [`AcknowledgementInterface`]: crate::interface::AcknowledgementInterface
#[derive(Debug, Error)]
pub enum SecomError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("refused by receiver policy: {0}")]
    Policy(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Wire shape of a rejected submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category token: `VALIDATION`, `POLICY` or `INTERNAL`.
    pub code: String,
    /// Offending request field, when one can be named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl From<&ValidationError> for ErrorResponse {
    fn from(err: &ValidationError) -> Self {
        Self {
            code: "VALIDATION".to_string(),
            field: Some(err.field().to_string()),
            message: err.to_string(),
        }
    }
}

impl From<&SecomError> for ErrorResponse {
    fn from(err: &SecomError) -> Self {
        match err {
            SecomError::Validation(inner) => Self::from(inner),
            SecomError::Policy(reason) => Self {
                code: "POLICY".to_string(),
                field: None,
                message: reason.clone(),
            },
            SecomError::Internal(detail) => Self {
                code: "INTERNAL".to_string(),
                field: None,
                message: detail.clone(),
            },
        }
    }
}
