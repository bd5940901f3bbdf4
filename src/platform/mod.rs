//! Platform detection and release metadata resolution
//!
//! This module maps the host architecture and operating system onto the
//! tokens used in release file names and expands the descriptor's URL
//! template with them.

mod detection;
mod metadata;

pub use detection::{Arch, HostPlatform, Os, Target};
pub use metadata::{PlatformMetadata, resolve, resolve_for_target};
