//! In-process [`DeliveryLog`] backed by a mutex-guarded map.
//!
//! Suitable for tests and single-node deployments; state does not
//! survive a restart. Multi-node setups should implement [`DeliveryLog`]
//! over shared storage instead.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use secom_proto::AckKind;

use crate::delivery::{AckReceipt, DeliveryLog, DeliveryLogError, DeliveryRecord};

#[derive(Default)]
pub struct MemoryDeliveryLog {
    records: Mutex<HashMap<String, DeliveryRecord>>,
}

impl MemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryLog for MemoryDeliveryLog {
    async fn record_delivery(
        &self,
        reference: &str,
        at: NaiveDateTime,
    ) -> Result<(), DeliveryLogError> {
        let mut records = self.records.lock().await;
        records
            .entry(reference.to_owned())
            .or_insert_with(|| DeliveryRecord::new(reference, at));
        Ok(())
    }

    async fn record_ack(
        &self,
        reference: &str,
        kind: AckKind,
        at: NaiveDateTime,
    ) -> Result<AckReceipt, DeliveryLogError> {
        let mut records = self.records.lock().await;
        let record = records
            .get_mut(reference)
            .ok_or_else(|| DeliveryLogError::UnknownReference(reference.to_owned()))?;
        Ok(record.record_ack(kind, at))
    }

    async fn find(&self, reference: &str) -> Result<Option<DeliveryRecord>, DeliveryLogError> {
        let records = self.records.lock().await;
        Ok(records.get(reference).cloned())
    }
}
