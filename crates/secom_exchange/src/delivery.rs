//! Delivery records and the storage contract behind the exchange.
//!
//! One [`DeliveryRecord`] exists per uploaded object, keyed by the
//! transaction reference the uploader and receiver share. The two
//! acknowledgement kinds land in separate slots; neither gates the other
//! and a repeat of the same kind never overwrites the first mark.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use secom_proto::{AckKind, AckOutcome};

/// Where a delivered object sits in the acknowledgement lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryState {
    /// Delivered to the end system, no acknowledgement received yet.
    Delivered,
    /// Only the technical acknowledgement is on file.
    TechnicallyAcknowledged,
    /// Only the operational acknowledgement is on file.
    OperationallyAcknowledged,
    /// Both kinds are on file. Derived for reporting — the protocol
    /// itself defines no terminal state.
    FullyAcknowledged,
}

/// What a store did with one acknowledgement submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckReceipt {
    pub outcome: AckOutcome,
    /// When the kind was marked. On a repeat submission this is the
    /// original mark, not the repeat's arrival time.
    pub recorded_at: NaiveDateTime,
}

/// Per-reference delivery bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Transaction reference of the delivered object.
    pub reference: String,
    pub delivered_at: NaiveDateTime,
    pub technical_ack_at: Option<NaiveDateTime>,
    pub operational_ack_at: Option<NaiveDateTime>,
}

impl DeliveryRecord {
    pub fn new(reference: impl Into<String>, delivered_at: NaiveDateTime) -> Self {
        Self {
            reference: reference.into(),
            delivered_at,
            technical_ack_at: None,
            operational_ack_at: None,
        }
    }

    pub fn acknowledged_at(&self, kind: AckKind) -> Option<NaiveDateTime> {
        match kind {
            AckKind::Technical => self.technical_ack_at,
            AckKind::Operational => self.operational_ack_at,
        }
    }

    /// Mark one kind as acknowledged. Idempotent: a second submission of
    /// the same kind returns [`AckOutcome::AlreadyRecorded`] and the
    /// timestamp of the first.
    pub fn record_ack(&mut self, kind: AckKind, at: NaiveDateTime) -> AckReceipt {
        let slot = match kind {
            AckKind::Technical => &mut self.technical_ack_at,
            AckKind::Operational => &mut self.operational_ack_at,
        };
        match *slot {
            Some(original) => AckReceipt {
                outcome: AckOutcome::AlreadyRecorded,
                recorded_at: original,
            },
            None => {
                *slot = Some(at);
                AckReceipt {
                    outcome: AckOutcome::Recorded,
                    recorded_at: at,
                }
            }
        }
    }

    pub fn state(&self) -> DeliveryState {
        match (
            self.technical_ack_at.is_some(),
            self.operational_ack_at.is_some(),
        ) {
            (false, false) => DeliveryState::Delivered,
            (true, false) => DeliveryState::TechnicallyAcknowledged,
            (false, true) => DeliveryState::OperationallyAcknowledged,
            (true, true) => DeliveryState::FullyAcknowledged,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryLogError {
    /// No delivery is on file under this reference.
    #[error("Unknown delivery reference: {0}")]
    UnknownReference(String),

    #[error("Delivery log backend failure: {0}")]
    Backend(String),
}

/// Durable tracking of delivery and acknowledgement state, one record
/// per reference. The exchange service holds this as a trait object so
/// deployments can plug in their own persistence.
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    /// Register that an object reached the end system. A repeated
    /// delivery of the same reference leaves the original record alone.
    async fn record_delivery(
        &self,
        reference: &str,
        at: NaiveDateTime,
    ) -> Result<(), DeliveryLogError>;

    /// Mark one acknowledgement kind for the reference.
    async fn record_ack(
        &self,
        reference: &str,
        kind: AckKind,
        at: NaiveDateTime,
    ) -> Result<AckReceipt, DeliveryLogError>;

    /// Current record, if the reference is known.
    async fn find(&self, reference: &str) -> Result<Option<DeliveryRecord>, DeliveryLogError>;
}
