//! Tool image references and tool declarations.

use std::fmt;

use dem_common::{ToolDescriptor, ToolType};

use crate::domain::error::DevEnvError;

/// A container image reference `name:version`.
///
/// Identity is the exact string pair: no normalization, no semver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolImage {
    pub name: String,
    pub version: String,
}

impl ToolImage {
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The `name:version` form used as the key in image sets.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }

    /// Parse `name:version`. The version is taken after the last `:` that
    /// follows the last `/`, so `host:5000/repo:tag` splits correctly.
    ///
    /// # Errors
    ///
    /// Returns an error if either half is empty or there is no tag.
    pub fn parse(reference: &str) -> Result<Self, DevEnvError> {
        let invalid = || {
            DevEnvError::InvalidTool(format!("'{reference}' is not an IMAGE:TAG reference"))
        };
        let slash = reference.rfind('/').map_or(0, |i| i + 1);
        let colon = reference[slash..]
            .rfind(':')
            .map(|i| i + slash)
            .ok_or_else(invalid)?;
        let (name, version) = (&reference[..colon], &reference[colon + 1..]);
        if name.is_empty() || version.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(name, version))
    }
}

impl fmt::Display for ToolImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// One tool declaration of a DevEnv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub tool_type: ToolType,
    pub image: ToolImage,
}

impl Tool {
    #[must_use]
    pub fn new(tool_type: ToolType, image: ToolImage) -> Self {
        Self { tool_type, image }
    }

    /// Parse a `TYPE=IMAGE:TAG` selection as given on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error on an unknown type or a malformed image reference.
    pub fn parse_selection(selection: &str) -> Result<Self, DevEnvError> {
        let (kind, reference) = selection.split_once('=').ok_or_else(|| {
            DevEnvError::InvalidTool(format!("'{selection}' is not TYPE=IMAGE:TAG"))
        })?;
        let tool_type = ToolType::from_cli_name(kind.trim()).ok_or_else(|| {
            let valid: Vec<&str> = ToolType::ALL.iter().map(|t| t.cli_name()).collect();
            DevEnvError::InvalidTool(format!(
                "unknown tool type '{kind}' (valid: {})",
                valid.join(", ")
            ))
        })?;
        Ok(Self::new(tool_type, ToolImage::parse(reference.trim())?))
    }
}

impl From<&ToolDescriptor> for Tool {
    fn from(d: &ToolDescriptor) -> Self {
        Self::new(
            d.tool_type,
            ToolImage::new(d.image_name.clone(), d.image_version.clone()),
        )
    }
}

impl From<&Tool> for ToolDescriptor {
    fn from(t: &Tool) -> Self {
        Self {
            tool_type: t.tool_type,
            image_name: t.image.name.clone(),
            image_version: t.image.version.clone(),
        }
    }
}
