//! Unit tests for task events and the in-memory broker.
