//! Infrastructure layer
//!
//! Implementations of domain traits against external systems.

pub mod graph;
