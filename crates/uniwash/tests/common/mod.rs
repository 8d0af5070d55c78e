//! Shared test utilities for uniwash integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring a controller to an in-memory store and a fixed clock
//! - `RecordingStore` for asserting write order and injecting failures
//! - Builders for master data

pub mod builders;
pub mod harness;
pub mod recording;

pub use builders::*;
pub use harness::TestHarness;
pub use recording::RecordingStore;
