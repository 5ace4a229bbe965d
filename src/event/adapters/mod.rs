//! Broker adapter implementations.

pub mod memory;
