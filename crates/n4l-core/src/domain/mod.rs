//! Domain layer
//!
//! Core types and repository traits, independent of any storage backend.

pub mod graph;
