use crate::error::ShimError;
use crate::package::{PackageDescriptor, PackageManifest, normalize_version};

use super::{HostPlatform, Target};

/// Download location and executable name for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformMetadata {
    /// Executable name, with `.exe` on Windows.
    pub name: String,
    /// URL template with every known placeholder substituted.
    pub url: String,
}

/// Resolve the descriptor for the given host identifiers.
///
/// Checks the architecture, then the OS, then the descriptor fields. No I/O.
pub fn resolve(
    manifest: &PackageManifest,
    host: &HostPlatform,
) -> Result<PlatformMetadata, ShimError> {
    let target = host.target()?;
    let descriptor = manifest.validate()?;
    Ok(resolve_for_target(&descriptor, target))
}

/// Resolve an already validated descriptor for a supported target.
pub fn resolve_for_target(descriptor: &PackageDescriptor, target: Target) -> PlatformMetadata {
    let version = normalize_version(&descriptor.version);
    let name = format!("{}{}", descriptor.binary.name, target.os.exe_suffix());

    let url = descriptor
        .binary
        .url
        .replace("{{arch}}", target.arch.vendor_token())
        .replace("{{platform}}", target.os.vendor_token())
        .replace("{{version}}", version)
        .replace("{{bin_name}}", &name);

    PlatformMetadata { name, url }
}
