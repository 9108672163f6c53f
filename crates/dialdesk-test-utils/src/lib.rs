// SPDX-FileCopyrightText: 2026 Dialdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dialdesk integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - in-memory store, services, and aggregation with a bootstrap admin
//! - [`ManualClock`] - a settable time source
//! - [`fixtures`] - valid request builders

pub mod clock;
pub mod fixtures;
pub mod harness;

pub use clock::ManualClock;
pub use harness::{TestHarness, TestHarnessBuilder};
