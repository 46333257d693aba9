//! Integration test crate for the Keel stablecoin module.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end flows across multiple workspace crates:
//! oracle registration, bucketed price feeds, and cross-token exchange.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p keel-integration-tests
//! ```
