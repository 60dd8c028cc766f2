use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Only documents with this major version can be read.
pub const SUPPORTED_MAJOR: u32 = 0;

/// Version written into every document this build saves.
pub const CURRENT_VERSION: DocumentVersion = DocumentVersion {
    major: SUPPORTED_MAJOR,
    minor: 1,
};

/// `MAJOR.MINOR` version carried by a DevEnv document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentVersion {
    pub major: u32,
    pub minor: u32,
}

/// The version string is not `MAJOR.MINOR`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid document version '{0}': expected MAJOR.MINOR")]
pub struct VersionParseError(pub String);

impl DocumentVersion {
    /// Whether a document of this version can be read by this build.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.major == SUPPORTED_MAJOR
    }
}

impl FromStr for DocumentVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        let major = major.parse::<u32>().map_err(|_| err())?;
        let minor = minor.parse::<u32>().map_err(|_| err())?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
