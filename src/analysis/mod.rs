//! Analysis modules.
//!
//! This module reshapes audit payloads into report view models.

pub mod aggregator;

pub use aggregator::*;
