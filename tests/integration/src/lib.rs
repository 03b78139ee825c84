//! Integration test utilities for the Wisdom engine
//!
//! This crate wires the services to the in-memory backend so engine
//! behavior can be exercised end to end without external services.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
