//! Working directory and child process execution.

use anyhow::{Context, Result};
use log::debug;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to determine the current directory")
    }

    #[tracing::instrument(skip(self, args))]
    pub(crate) fn run_impl(
        &self,
        program: &Path,
        args: &[OsString],
        cwd: &Path,
    ) -> std::io::Result<Option<i32>> {
        debug!("Running {:?} with {} argument(s)", program, args.len());

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        debug!("{:?} exited with {}", program, status);
        Ok(status.code())
    }
}
