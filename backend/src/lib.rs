//! Campus Coffee backend library.
//!
//! Imports OpenStreetMap nodes as campus points of sale. The `domain` module
//! holds the pure model and services; `outbound` holds the adapters that
//! implement its driven ports.

pub mod domain;
pub mod outbound;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
