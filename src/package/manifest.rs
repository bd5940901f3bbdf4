use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::error::ShimError;
use crate::runtime::Runtime;

/// Host package metadata as found on disk.
///
/// Only `version` and `binary` are read; every other key is ignored. Fields
/// are kept loosely typed so that a wrongly shaped value is reported as a
/// configuration error by [`PackageManifest::validate`] rather than as a
/// parse failure.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PackageManifest {
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub binary: Option<Value>,
}

/// A descriptor that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    pub version: String,
    pub binary: BinarySpec,
}

/// What to download and which archive entry to run.
#[derive(Debug, Clone, PartialEq)]
pub struct BinarySpec {
    pub name: String,
    pub url: String,
}

impl PackageManifest {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self, ShimError> {
        let content =
            runtime
                .read_to_string(path)
                .map_err(|e| ShimError::ManifestUnreadable {
                    path: path.to_path_buf(),
                    message: format!("{:#}", e),
                })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ShimError> {
        serde_json::from_str(content).map_err(|e| ShimError::InvalidConfiguration(e.to_string()))
    }

    /// Check the required fields, in the order `version`, `binary`,
    /// `binary.name`, `binary.url`. Empty strings count as missing.
    pub fn validate(&self) -> Result<PackageDescriptor, ShimError> {
        let invalid = |msg: &str| ShimError::InvalidConfiguration(msg.to_string());

        let version = non_empty_str(self.version.as_ref())
            .ok_or_else(|| invalid("'version' property must be specified"))?;

        let binary = match &self.binary {
            Some(Value::Object(binary)) => binary,
            _ => return Err(invalid("'binary' property must be defined and be an object")),
        };

        let name = non_empty_str(binary.get("name"))
            .ok_or_else(|| invalid("'name' property is necessary"))?;
        let url = non_empty_str(binary.get("url"))
            .ok_or_else(|| invalid("'url' property is required"))?;

        Ok(PackageDescriptor {
            version: version.to_string(),
            binary: BinarySpec {
                name: name.to_string(),
                url: url.to_string(),
            },
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
