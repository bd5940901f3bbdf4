//! Host package descriptor
//!
//! Reading and validating the `version` and `binary` fields of the host
//! package metadata file.

mod manifest;
mod version;

pub use manifest::{BinarySpec, PackageDescriptor, PackageManifest};
pub use version::normalize_version;
