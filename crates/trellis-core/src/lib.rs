//! Trellis Core
//!
//! This crate contains the ambient utilities shared by the trellis crates:
//! logging setup, profiling hooks, hash collections, geometry value types
//! and configuration.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
