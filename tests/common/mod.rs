//! Common test utilities and helpers
//!
//! Shared fixtures and mock services for the integration tests. Each test
//! binary uses a different subset.
#![allow(dead_code)]

pub mod mock_services;
pub mod test_fixtures;
