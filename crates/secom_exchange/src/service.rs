//! The acknowledgement exchange service.
//!
//! Implements [`AcknowledgementInterface`] over a [`DeliveryLog`]: a
//! submission is validated, checked against the local [`AckPolicy`] and
//! then marked in the log. Transports mount this behind
//! `POST /v1/acknowledgement` and translate [`SecomError`] variants to
//! status codes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use secom_proto::{
    AckKind, AckOutcome, AcknowledgementInterface, AcknowledgementRequest,
    AcknowledgementResponse, SecomError, ValidationError,
};

use crate::delivery::{DeliveryLog, DeliveryLogError};

/// Local acceptance rules, on top of what the protocol requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct AckPolicy {
    /// Refuse an operational acknowledgement while no technical one is
    /// on file. Off by default: the protocol does not order the kinds,
    /// and an end user can open an object before the delivery report
    /// arrives.
    pub require_technical_first: bool,
}

pub struct AcknowledgementService {
    log: Arc<dyn DeliveryLog>,
    policy: AckPolicy,
}

impl AcknowledgementService {
    pub fn new(log: Arc<dyn DeliveryLog>) -> Self {
        Self {
            log,
            policy: AckPolicy::default(),
        }
    }

    pub fn with_policy(log: Arc<dyn DeliveryLog>, policy: AckPolicy) -> Self {
        Self { log, policy }
    }

    async fn check_policy(&self, request: &AcknowledgementRequest) -> Result<(), SecomError> {
        if !self.policy.require_technical_first || request.kind != AckKind::Operational {
            return Ok(());
        }
        // Unknown references fail validation before the ordering rule
        // applies.
        let record = self
            .log
            .find(&request.reference)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| {
                SecomError::Validation(ValidationError::UnknownReference(
                    request.reference.clone(),
                ))
            })?;
        if record.acknowledged_at(AckKind::Technical).is_some() {
            Ok(())
        } else {
            Err(SecomError::Policy(format!(
                "operational acknowledgement for {} refused: no technical acknowledgement on file",
                request.reference
            )))
        }
    }
}

fn store_failure(err: DeliveryLogError) -> SecomError {
    match err {
        DeliveryLogError::UnknownReference(reference) => {
            SecomError::Validation(ValidationError::UnknownReference(reference))
        }
        DeliveryLogError::Backend(detail) => SecomError::Internal(detail),
    }
}

#[async_trait]
impl AcknowledgementInterface for AcknowledgementService {
    async fn acknowledgement(
        &self,
        request: AcknowledgementRequest,
    ) -> Result<AcknowledgementResponse, SecomError> {
        if let Err(err) = request.validate() {
            warn!(field = err.field(), error = %err, "acknowledgement rejected");
            return Err(err.into());
        }
        if let Err(err) = self.check_policy(&request).await {
            warn!(reference = %request.reference, error = %err, "acknowledgement refused");
            return Err(err);
        }

        let receipt = self
            .log
            .record_ack(&request.reference, request.kind, Utc::now().naive_utc())
            .await
            .map_err(|err| {
                let err = store_failure(err);
                warn!(reference = %request.reference, error = %err, "acknowledgement not recorded");
                err
            })?;

        info!(
            reference = %request.reference,
            kind = %request.kind,
            outcome = ?receipt.outcome,
            "acknowledgement recorded"
        );

        let message = match receipt.outcome {
            AckOutcome::Recorded => None,
            AckOutcome::AlreadyRecorded => Some(format!(
                "{} acknowledgement was already on file for {}",
                request.kind, request.reference
            )),
        };
        Ok(AcknowledgementResponse {
            reference: request.reference,
            kind: request.kind,
            outcome: receipt.outcome,
            message,
            recorded_at: receipt.recorded_at,
        })
    }
}
