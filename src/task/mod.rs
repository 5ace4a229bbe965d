//! Task store: tasks, their attachments, and the mutation path that feeds
//! the event stream.
//!
//! Mutations go through [`services::TaskService`], which publishes one
//! lifecycle event after each committed create, update, or delete. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
