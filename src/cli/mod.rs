//! Command-line interface
//!
//! A thin wrapper over the library for checking and inspecting
//! configuration sources.

pub mod args;
pub mod commands;
