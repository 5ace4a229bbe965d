//! Step definitions for task lifecycle event scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
