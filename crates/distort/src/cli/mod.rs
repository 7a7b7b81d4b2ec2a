//! Command implementations for the `distort` binary.

pub mod config;
pub mod interactive;
pub mod run;
