//! Property-based tests for the parser.
//!
//! These check invariants that hold for any input: no panics, a consistent
//! tree, bounded resources and lossless canonical serialization.

mod generators;
mod invariants;
