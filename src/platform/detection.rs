use std::fmt;
use std::str::FromStr;

use crate::error::ShimError;

/// CPU architectures a release can be published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Ia32,
    X64,
    Arm,
}

impl Arch {
    pub const ALL: [Arch; 3] = [Arch::Ia32, Arch::X64, Arch::Arm];

    /// Token used in release file names.
    pub fn vendor_token(self) -> &'static str {
        match self {
            Arch::Ia32 => "386",
            Arch::X64 => "amd64",
            Arch::Arm => "arm",
        }
    }
}

impl FromStr for Arch {
    type Err = ShimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ia32" | "x86" => Ok(Arch::Ia32),
            "x64" | "x86_64" => Ok(Arch::X64),
            "arm" => Ok(Arch::Arm),
            other => Err(ShimError::UnsupportedArchitecture(other.to_string())),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vendor_token())
    }
}

/// Operating systems a release can be published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Win32,
    FreeBsd,
}

impl Os {
    pub const ALL: [Os; 4] = [Os::Darwin, Os::Linux, Os::Win32, Os::FreeBsd];

    /// Token used in release file names.
    pub fn vendor_token(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Win32 => "windows",
            Os::FreeBsd => "freebsd",
        }
    }

    /// Suffix appended to executable names on this OS.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            Os::Win32 => ".exe",
            Os::Darwin | Os::Linux | Os::FreeBsd => "",
        }
    }
}

impl FromStr for Os {
    type Err = ShimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "darwin" | "macos" => Ok(Os::Darwin),
            "linux" => Ok(Os::Linux),
            "win32" | "windows" => Ok(Os::Win32),
            "freebsd" => Ok(Os::FreeBsd),
            other => Err(ShimError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.vendor_token())
    }
}

/// Raw architecture and OS identifiers as reported by the host (or supplied
/// on the command line). Validated lazily by [`HostPlatform::target`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostPlatform {
    pub arch: String,
    pub os: String,
}

impl HostPlatform {
    pub fn new(arch: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            os: os.into(),
        }
    }

    /// Identifiers of the running process.
    pub fn detect() -> Self {
        Self::new(std::env::consts::ARCH, std::env::consts::OS)
    }

    /// Validate the identifiers. The architecture is checked before the OS.
    pub fn target(&self) -> Result<Target, ShimError> {
        let arch = self.arch.parse()?;
        let os = self.os.parse()?;
        Ok(Target { arch, os })
    }
}

/// A supported architecture/OS pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub arch: Arch,
    pub os: Os,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.os, self.arch)
    }
}
