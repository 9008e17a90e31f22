//! Common utilities for the Wren renderer.
//!
//! This crate provides shared infrastructure used by all rendering stages:
//! - **Warning System** - deduplicated, colored terminal output for input the
//!   engine recovers from or ignores

pub mod warning;
