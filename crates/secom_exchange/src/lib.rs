//! secom_exchange — Acknowledgement exchange and delivery tracking
//!
//! # Delivery lifecycle
//! Every uploaded object starts in `DELIVERED` once it reaches the end
//! system. Technical and operational acknowledgements then arrive as
//! independent reports — in either order, possibly only one of them —
//! and each moves the record forward without gating on the other.
//!
//! # Storage strategy
//! The exchange itself is storage-agnostic: it talks to a [`DeliveryLog`]
//! trait object, so deployments can back it with their own database.
//! [`MemoryDeliveryLog`] ships as the in-process implementation used by
//! tests and single-node setups.

pub mod delivery;
pub mod memory;
pub mod service;

pub use delivery::{AckReceipt, DeliveryLog, DeliveryLogError, DeliveryRecord, DeliveryState};
pub use memory::MemoryDeliveryLog;
pub use service::{AckPolicy, AcknowledgementService};
