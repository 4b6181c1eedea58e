//! Extension descriptor as seen by contribution handlers.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Identity and install location of one loaded extension.
///
/// Descriptors are produced by the extension loader; contribution handlers
/// only read them (icon paths resolve against `install_root`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    /// Stable extension identifier, e.g. `acme.tools`.
    pub id: String,
    /// Extension semantic version string (`major.minor.patch`).
    pub version: String,
    /// Absolute directory the extension is installed under.
    pub install_root: PathBuf,
}

impl ExtensionDescriptor {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        install_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            install_root: install_root.into(),
        }
    }

    pub fn install_root(&self) -> &Path {
        self.install_root.as_path()
    }

    /// Validates declaration-level descriptor invariants.
    pub fn validate(&self) -> Result<(), DescriptorValidationError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(DescriptorValidationError::EmptyId);
        }
        if !is_valid_extension_id(id) {
            return Err(DescriptorValidationError::InvalidId(self.id.clone()));
        }

        let version = self.version.trim();
        if version.is_empty() {
            return Err(DescriptorValidationError::EmptyVersion);
        }
        if !is_semver_triplet(version) {
            return Err(DescriptorValidationError::InvalidVersion(
                self.version.clone(),
            ));
        }

        if !self.install_root.is_absolute() {
            return Err(DescriptorValidationError::RelativeInstallRoot(
                self.install_root.clone(),
            ));
        }
        Ok(())
    }
}

fn is_valid_extension_id(value: &str) -> bool {
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    let mut prev_separator = false;
    for c in chars {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_separator = false;
            continue;
        }
        if c == '.' || c == '_' || c == '-' {
            if prev_separator {
                return false;
            }
            prev_separator = true;
            continue;
        }
        return false;
    }
    !prev_separator
}

fn is_semver_triplet(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValidationError {
    EmptyId,
    InvalidId(String),
    EmptyVersion,
    InvalidVersion(String),
    RelativeInstallRoot(PathBuf),
}

impl Display for DescriptorValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "extension id must not be empty"),
            Self::InvalidId(value) => write!(f, "extension id is invalid: {value}"),
            Self::EmptyVersion => write!(f, "extension version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "extension version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::RelativeInstallRoot(path) => write!(
                f,
                "extension install root must be absolute: {}",
                path.display()
            ),
        }
    }
}

impl Error for DescriptorValidationError {}
