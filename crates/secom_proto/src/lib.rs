//! secom_proto — SECOM wire contract: protocol types and serialisation
//!
//! SECOM is a standardised protocol for exchanging maritime operational
//! data between ship and shore systems. This crate defines the wire-level
//! contract that compliant services implement — the custom scalar
//! encodings and the REST-style interface shapes — not a running service.
//! Transport (HTTP routing, TLS) and persistence are external
//! collaborators.
//!
//! # Modules
//! - `timestamp` — the SECOM date-time text encoding (`YYYYMMDDTHHMMSS`)
//! - `ack`       — acknowledgement request/response message shapes
//! - `error`     — validation failures and the interface boundary error
//! - `interface` — the acknowledgement endpoint contract

pub mod ack;
pub mod error;
pub mod interface;
pub mod timestamp;

pub use ack::{AckKind, AckOutcome, AcknowledgementRequest, AcknowledgementResponse};
pub use error::{ErrorResponse, SecomError, ValidationError};
pub use interface::{AcknowledgementInterface, ACKNOWLEDGEMENT_INTERFACE_PATH};
pub use timestamp::{DecodeResult, TimestampError, SECOM_DATE_TIME_FORMAT};
