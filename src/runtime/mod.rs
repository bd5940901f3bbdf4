//! Runtime abstraction for system operations.
//!
//! Reading the descriptor, inspecting the working directory and running the
//! installed executable all go through [`Runtime`], so the installer can be
//! driven by a mock in tests.
//!
//! # Structure
//!
//! - `fs` - File system operations
//! - `process` - Working directory and child process execution

mod fs;
mod process;

use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;

    // Process
    fn current_dir(&self) -> Result<PathBuf>;

    /// Run `program` with `args` in `cwd`, inheriting the standard streams,
    /// and wait for it. Returns the exit code, or `None` when the child has
    /// none (e.g. it was killed by a signal).
    fn run(&self, program: &Path, args: &[OsString], cwd: &Path) -> std::io::Result<Option<i32>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn run(&self, program: &Path, args: &[OsString], cwd: &Path) -> std::io::Result<Option<i32>> {
        self.run_impl(program, args, cwd)
    }
}
