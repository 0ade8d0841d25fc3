//! Package metadata available at runtime.
//!
//! The descriptor mirrors what `Cargo.toml` declares for distribution: one
//! executable and no runtime requirements beyond the binary itself.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::ValidationError;

/// Name of the single executable this package installs.
pub const SCRIPT_NAME: &str = "cliresms";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
    pub license: String,
    pub scripts: Vec<String>,
    pub install_requires: Vec<String>,
    pub extras_require: BTreeMap<String, Vec<String>>,
}

impl PackageDescriptor {
    /// Descriptor of this build, taken from Cargo metadata.
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            description: env!("CARGO_PKG_DESCRIPTION").to_owned(),
            homepage: env!("CARGO_PKG_HOMEPAGE").to_owned(),
            license: env!("CARGO_PKG_LICENSE").to_owned(),
            scripts: vec![SCRIPT_NAME.to_owned()],
            install_requires: Vec::new(),
            extras_require: BTreeMap::new(),
        }
    }

    /// A package is installable only with a name and a version.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if self.version.trim().is_empty() {
            return Err(ValidationError::Empty { field: "version" });
        }
        Ok(())
    }

    pub fn executables(&self) -> &[String] {
        &self.scripts
    }
}
