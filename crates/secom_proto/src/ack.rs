//! Acknowledgement exchange message shapes.
//!
//! During upload of information an acknowledgement can be requested: one
//! when the uploaded message has been delivered to the end system
//! (technical) and one when it has been opened by the end user
//! (operational). The report always carries a reference to the delivered
//! object. The two kinds are independent submissions — either may arrive
//! first, later, or not at all.
//!
//! Both shapes are value objects: no shared state, alive for one
//! exchange.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::timestamp;

/// Which confirmation a report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckKind {
    /// The delivered object reached the receiving end system.
    Technical,
    /// The delivered object was opened (read) by the end user.
    Operational,
}

impl AckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AckKind::Technical => "TECHNICAL",
            AckKind::Operational => "OPERATIONAL",
        }
    }
}

impl fmt::Display for AckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AckKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TECHNICAL" => Ok(AckKind::Technical),
            "OPERATIONAL" => Ok(AckKind::Operational),
            other => Err(ValidationError::UnknownAckKind(other.to_string())),
        }
    }
}

/// A caller's report that a previously delivered object reached the given
/// state. `reference` correlates 1:1 with the delivered object; the
/// receiving side must be able to resolve it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgementRequest {
    /// Identifier of the delivered object being acknowledged.
    pub reference: String,
    /// Which acknowledgement is being reported.
    pub kind: AckKind,
    /// When the acknowledging side generated this report. Lenient on the
    /// wire: a malformed value reads as absent, matching deployed SECOM
    /// encoders.
    #[serde(
        default,
        with = "timestamp::secom_format_option_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl AcknowledgementRequest {
    pub fn new(reference: impl Into<String>, kind: AckKind) -> Self {
        Self {
            reference: reference.into(),
            kind,
            created_at: None,
        }
    }

    /// Structural validation. The receiving side answers a submission
    /// only after this passes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reference.trim().is_empty() {
            return Err(ValidationError::EmptyField("reference"));
        }
        Ok(())
    }
}

impl TryFrom<Value> for AcknowledgementRequest {
    type Error = ValidationError;

    /// Wire-level construction with field-precise failures, so a receiver
    /// can answer a malformed submission with a structured error instead
    /// of a bare deserialisation failure.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let reference = value
            .get("reference")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingField("reference"))?
            .to_string();
        if reference.trim().is_empty() {
            return Err(ValidationError::EmptyField("reference"));
        }
        let kind = match value.get("kind") {
            None | Some(Value::Null) => return Err(ValidationError::MissingField("kind")),
            Some(Value::String(token)) => token.parse::<AckKind>()?,
            Some(other) => return Err(ValidationError::UnknownAckKind(other.to_string())),
        };
        let created_at = timestamp::decode(value.get("created_at").and_then(Value::as_str)).lenient();
        Ok(Self {
            reference,
            kind,
            created_at,
        })
    }
}

/// Receiving-side outcome of recording one acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckOutcome {
    /// First time this kind was recorded for the reference.
    Recorded,
    /// This kind was already on file; the original record stands.
    AlreadyRecorded,
}

/// The receiving system's confirmation that an acknowledgement was
/// recorded. Emitted only after the request passed structural validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgementResponse {
    /// Echo of the reference the report correlated to.
    pub reference: String,
    /// Which kind was recorded.
    pub kind: AckKind,
    pub outcome: AckOutcome,
    /// Optional human/machine-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the receiving system recorded this kind — the original mark's
    /// time when the submission was a repeat.
    #[serde(with = "timestamp::secom_format")]
    pub recorded_at: NaiveDateTime,
}
