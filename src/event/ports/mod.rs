//! Port contracts for the event broker.
//!
//! Producers only need [`EventBroker`]; consumers subscribe through
//! [`EventSource`]. A real Kafka client would implement both.

pub mod broker;

pub use broker::{
    BrokerError, BrokerResult, ConsumedRecord, DeliveryReceipt, EventBroker, EventSource,
    EventSubscription, OutboundRecord,
};
