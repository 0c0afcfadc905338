//! sqmgen CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `sqmgen` binary.

pub mod cli;
pub mod input;
pub mod output;
pub mod report;

pub use cli::Args;
