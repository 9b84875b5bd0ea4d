use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use secom_exchange::{AckPolicy, AcknowledgementService, DeliveryLog, DeliveryState, MemoryDeliveryLog};
use secom_proto::timestamp::DecodeResult;
use secom_proto::{
    AckKind, AckOutcome, AcknowledgementInterface, AcknowledgementRequest, ErrorResponse,
    SecomError, ValidationError, ACKNOWLEDGEMENT_INTERFACE_PATH,
};

fn ts(text: &str) -> NaiveDateTime {
    match secom_proto::timestamp::decode(Some(text)) {
        DecodeResult::Value(value) => value,
        other => panic!("fixture timestamp {text} did not decode: {other:?}"),
    }
}

fn fresh_reference() -> String {
    format!("OBJ-{}", Uuid::new_v4())
}

/// Service over an in-memory log with one object already delivered.
async fn delivered_service() -> (AcknowledgementService, Arc<MemoryDeliveryLog>, String) {
    let log = Arc::new(MemoryDeliveryLog::new());
    let reference = fresh_reference();
    log.record_delivery(&reference, ts("19850412T101530"))
        .await
        .unwrap();
    (AcknowledgementService::new(log.clone()), log, reference)
}

#[tokio::test]
async fn accepted_acknowledgement_echoes_the_submission() {
    let (service, _log, reference) = delivered_service().await;

    let response = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Technical))
        .await
        .unwrap();

    assert_eq!(response.reference, reference);
    assert_eq!(response.kind, AckKind::Technical);
    assert_eq!(response.outcome, AckOutcome::Recorded);
    assert_eq!(response.message, None);
}

#[tokio::test]
async fn blank_reference_is_rejected_before_the_store() {
    let (service, _log, _reference) = delivered_service().await;

    let err = service
        .acknowledgement(AcknowledgementRequest::new("   ", AckKind::Technical))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SecomError::Validation(ValidationError::EmptyField("reference"))
    ));
    assert_eq!(ErrorResponse::from(&err).field.as_deref(), Some("reference"));
}

#[tokio::test]
async fn acknowledging_an_undelivered_object_is_rejected() {
    let (service, _log, _reference) = delivered_service().await;
    let unknown = fresh_reference();

    let err = service
        .acknowledgement(AcknowledgementRequest::new(&unknown, AckKind::Operational))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SecomError::Validation(ValidationError::UnknownReference(reference))
            if reference == unknown
    ));
}

#[tokio::test]
async fn kinds_are_independent_and_unordered() {
    let (service, log, reference) = delivered_service().await;

    // Operational first: the protocol does not order the kinds.
    let operational = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Operational))
        .await
        .unwrap();
    let technical = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Technical))
        .await
        .unwrap();

    assert_eq!(operational.outcome, AckOutcome::Recorded);
    assert_eq!(technical.outcome, AckOutcome::Recorded);

    let record = log.find(&reference).await.unwrap().unwrap();
    assert!(record.acknowledged_at(AckKind::Technical).is_some());
    assert!(record.acknowledged_at(AckKind::Operational).is_some());
    assert_eq!(record.state(), DeliveryState::FullyAcknowledged);
}

#[tokio::test]
async fn policy_can_require_technical_first() {
    let log = Arc::new(MemoryDeliveryLog::new());
    let reference = fresh_reference();
    log.record_delivery(&reference, ts("19850412T101530"))
        .await
        .unwrap();
    let service = AcknowledgementService::with_policy(
        log,
        AckPolicy {
            require_technical_first: true,
        },
    );

    let refused = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Operational))
        .await
        .unwrap_err();
    assert!(matches!(refused, SecomError::Policy(_)));

    service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Technical))
        .await
        .unwrap();
    let accepted = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Operational))
        .await
        .unwrap();
    assert_eq!(accepted.outcome, AckOutcome::Recorded);
}

#[tokio::test]
async fn unknown_reference_outranks_the_ordering_policy() {
    // Never-delivered objects must fail validation, not the policy.
    let service = AcknowledgementService::with_policy(
        Arc::new(MemoryDeliveryLog::new()),
        AckPolicy {
            require_technical_first: true,
        },
    );
    let unknown = fresh_reference();

    let err = service
        .acknowledgement(AcknowledgementRequest::new(&unknown, AckKind::Operational))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SecomError::Validation(ValidationError::UnknownReference(reference))
            if reference == unknown
    ));
}

#[tokio::test]
async fn duplicate_submission_is_idempotent() {
    let (service, _log, reference) = delivered_service().await;

    let first = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Technical))
        .await
        .unwrap();
    let repeat = service
        .acknowledgement(AcknowledgementRequest::new(&reference, AckKind::Technical))
        .await
        .unwrap();

    assert_eq!(repeat.outcome, AckOutcome::AlreadyRecorded);
    assert_eq!(repeat.recorded_at, first.recorded_at);
    let message = repeat.message.unwrap();
    assert!(message.contains("already on file"), "message: {message}");
}

#[tokio::test]
async fn wire_submission_round_trips() {
    let (service, _log, reference) = delivered_service().await;

    let request = AcknowledgementRequest::try_from(json!({
        "reference": reference,
        "kind": "TECHNICAL",
        "created_at": "19850412T101530",
    }))
    .unwrap();
    assert_eq!(request.created_at, Some(ts("19850412T101530")));

    let response = service.acknowledgement(request).await.unwrap();
    let wire = serde_json::to_value(&response).unwrap();
    assert_eq!(wire["outcome"], "RECORDED");

    let recorded_at = wire["recorded_at"].as_str().unwrap();
    assert!(matches!(
        secom_proto::timestamp::decode(Some(recorded_at)),
        DecodeResult::Value(_)
    ));
}

#[tokio::test]
async fn unknown_kind_reports_the_kind_field() {
    let err = AcknowledgementRequest::try_from(json!({
        "reference": "OBJ-123",
        "kind": "DELIVERED",
    }))
    .unwrap_err();

    assert!(matches!(
        err,
        ValidationError::UnknownAckKind(ref token) if token == "DELIVERED"
    ));
    assert_eq!(ErrorResponse::from(&err).field.as_deref(), Some("kind"));
}

#[tokio::test]
async fn concurrent_submissions_keep_references_apart() {
    let log = Arc::new(MemoryDeliveryLog::new());
    let now = Utc::now().naive_utc();
    let references: Vec<String> = (0..8).map(|_| fresh_reference()).collect();
    for reference in &references {
        log.record_delivery(reference, now).await.unwrap();
    }
    let service = Arc::new(AcknowledgementService::new(log.clone()));

    let mut handles = Vec::new();
    for (n, reference) in references.iter().cloned().enumerate() {
        let service = service.clone();
        let kind = if n % 2 == 0 {
            AckKind::Technical
        } else {
            AckKind::Operational
        };
        handles.push(tokio::spawn(async move {
            service
                .acknowledgement(AcknowledgementRequest::new(reference, kind))
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().outcome, AckOutcome::Recorded);
    }

    for (n, reference) in references.iter().enumerate() {
        let record = log.find(reference).await.unwrap().unwrap();
        let expected = if n % 2 == 0 {
            DeliveryState::TechnicallyAcknowledged
        } else {
            DeliveryState::OperationallyAcknowledged
        };
        assert_eq!(record.state(), expected);
    }
}

#[test]
fn endpoint_path_is_pinned() {
    assert_eq!(ACKNOWLEDGEMENT_INTERFACE_PATH, "/v1/acknowledgement");
}
