// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Functional tests for the admission pipeline.
//!
//! These tests drive raw request bytes through `review` and inspect the
//! response bytes, exactly as the API server would see them. No socket
//! or cluster is required.
//!
//! ```bash
//! cargo test --test functional
//! ```

mod scenario_tests;
