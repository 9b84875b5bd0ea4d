//! The acknowledgement interface definition.
//!
//! SECOM-compliant services implement this trait to direct the
//! implementation of the relevant endpoint; the shape — path, message
//! types, validation contract — stays centralised here and independent of
//! any web framework. A transport layer mounts implementations at
//! [`ACKNOWLEDGEMENT_INTERFACE_PATH`] and owns status-code mapping.

use async_trait::async_trait;

use crate::ack::{AcknowledgementRequest, AcknowledgementResponse};
use crate::error::SecomError;

/// Endpoint path of the acknowledgement exchange.
pub const ACKNOWLEDGEMENT_INTERFACE_PATH: &str = "/v1/acknowledgement";

/// POST /v1/acknowledgement.
///
/// During upload of information an acknowledgement can be requested,
/// expected when the uploaded message has been delivered to the end
/// system (technical acknowledgement) and when it has been opened by the
/// end user (operational acknowledgement). The request carries a
/// reference to the delivered object; the two kinds are independent
/// submissions that the protocol does not order.
#[async_trait]
pub trait AcknowledgementInterface: Send + Sync {
    /// Record the reported acknowledgement and confirm it.
    ///
    /// A missing or unrecognised reference or kind is a
    /// [`SecomError::Validation`] rejection, distinct from
    /// transport-level failures. On success the receiving system has
    /// durably recorded that this kind arrived for this reference.
    async fn acknowledgement(
        &self,
        request: AcknowledgementRequest,
    ) -> Result<AcknowledgementResponse, SecomError>;
}
