//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Handle on the compiled `tailcfg` binary.
pub struct TailcfgProcess;

impl TailcfgProcess {
    /// Absolute path to a file under `tests/fixtures/`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    /// Runs the binary to completion with `args`, quiet logging and no
    /// inherited configuration.
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::spawn_command_with_env(args, &[])
    }

    /// Like [`spawn_command`](Self::spawn_command), with extra environment
    /// variables set for the child only.
    pub fn spawn_command_with_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_tailcfg"))
            .args(args)
            .env_remove("TAILCFG_CONFIG")
            .env_remove("TAILCFG_LOG_LEVEL")
            .env_remove("TAILCFG_MAX_SOURCE_BYTES")
            .env_remove("TAILCFG_MAX_DEPTH")
            .env("TAILCFG_COLOR", "never")
            .envs(envs.iter().copied())
            .output()
            .expect("failed to run tailcfg")
    }
}
