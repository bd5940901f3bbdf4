//! Invocation context for a shim run.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::platform::HostPlatform;

/// Descriptor file looked up in the working directory by default.
pub const MANIFEST_FILE: &str = "package.json";

/// Everything a run needs from the process environment, gathered once by the
/// caller so the installer never consults globals.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallContext {
    /// Working directory of the invocation; the child inherits it.
    pub cwd: PathBuf,
    /// Package descriptor to read.
    pub manifest_path: PathBuf,
    /// Path of the invoking wrapper. Only its directory is used.
    pub wrapper_path: PathBuf,
    /// Arguments forwarded to the installed executable.
    pub args: Vec<OsString>,
    /// Identifiers to resolve the release for.
    pub host: HostPlatform,
}

impl InstallContext {
    pub fn new(
        cwd: PathBuf,
        wrapper_path: PathBuf,
        args: Vec<OsString>,
        host: HostPlatform,
    ) -> Self {
        let manifest_path = cwd.join(MANIFEST_FILE);
        Self {
            cwd,
            manifest_path,
            wrapper_path,
            args,
            host,
        }
    }

    /// Read the descriptor from `path` (relative paths are taken from `cwd`).
    pub fn with_manifest(mut self, path: PathBuf) -> Self {
        self.manifest_path = self.cwd.join(path);
        self
    }

    /// Directory the executable is unpacked into: the wrapper's parent,
    /// anchored at `cwd` when relative.
    pub fn install_dir(&self) -> PathBuf {
        match self.wrapper_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.cwd.join(parent),
            _ => self.cwd.clone(),
        }
    }
}
