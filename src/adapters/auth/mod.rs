//! Authentication adapters.
//!
//! The HTTP gateway lives in `adapters::api`; this module holds the mock
//! used by tests and offline runs.

mod mock;

pub use mock::MockAuthGateway;
