//! Taskflow: task store with an event-driven notification pipeline.
//!
//! Every committed change to a task is announced as a lifecycle event on a
//! partitioned topic. A consumer group reads the topic and turns each event
//! into a user-facing notification. Signed identity tokens identify the
//! callers of the task store.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, broker, etc.)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`auth`]: Identity token issuance and verification
//! - [`task`]: Tasks, attachments, and the publishing mutation path
//! - [`event`]: Task event schema, broker contract, and publisher
//! - [`notification`]: Consumer loop, dispatcher, and notification handlers
//! - [`config`]: Process configuration
//! - [`telemetry`]: Structured logging setup

pub mod auth;
pub mod clock;
pub mod config;
pub mod event;
pub mod notification;
pub mod task;
pub mod telemetry;
