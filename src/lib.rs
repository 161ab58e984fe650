//! `tailcfg` - configuration loader for utility-class CSS generation
//!
//! Reads a configuration source (content globs, theme overrides, plugin
//! references), validates its shape, merges theme overrides over explicitly
//! injected defaults and resolves plugins through a static registry. The
//! result is an immutable [`config::Configuration`] for the generation
//! engine to consume.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod plugin;
