//! The Development Environment entity.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::collections::BTreeSet;

use dem_common::{DevEnvDescriptor, ToolType};
use serde::Serialize;

use crate::domain::availability::Classification;
use crate::domain::error::DevEnvError;
use crate::domain::tool::{Tool, ToolImage};

/// Longest accepted DevEnv name.
pub const MAX_NAME_LEN: usize = 64;

/// A named bundle of tool image declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevEnv {
    pub name: String,
    /// At most one tool per type, in canonical type order.
    tools: Vec<Tool>,
    pub installed: bool,
    pub default: bool,
}

/// Lifecycle state derived from the installed flag and a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DevEnvState {
    Uninstalled,
    Installed,
    /// Marked installed but some tool images are missing locally.
    Stale,
}

impl DevEnvState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DevEnvState::Uninstalled => "not installed",
            DevEnvState::Installed => "installed",
            DevEnvState::Stale => "stale",
        }
    }
}

/// Validate a DevEnv name.
///
/// # Errors
///
/// Returns `DevEnvError::InvalidName` for empty, overlong, or names containing
/// whitespace or `/`.
pub fn validate_dev_env_name(name: &str) -> Result<(), DevEnvError> {
    let ok = !name.is_empty()
        && name.chars().count() <= MAX_NAME_LEN
        && !name.chars().any(|c| c.is_whitespace() || c == '/');
    if ok {
        Ok(())
    } else {
        Err(DevEnvError::InvalidName(name.to_string()))
    }
}

impl DevEnv {
    /// Create an uninstalled, non-default DevEnv.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid name or when two tools share a type.
    pub fn new(name: &str, tools: Vec<Tool>) -> Result<Self, DevEnvError> {
        validate_dev_env_name(name)?;
        Ok(Self {
            name: name.to_string(),
            tools: normalize_tools(tools)?,
            installed: false,
            default: false,
        })
    }

    /// Build from a stored descriptor, keeping its flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor violates DevEnv invariants.
    pub fn from_descriptor(d: &DevEnvDescriptor) -> Result<Self, DevEnvError> {
        let mut env = Self::new(&d.name, d.tools.iter().map(Tool::from).collect())?;
        env.installed = d.installed;
        env.default = d.default;
        Ok(env)
    }

    /// Build from a catalog or exported definition: flags are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor violates DevEnv invariants.
    pub fn from_definition(d: &DevEnvDescriptor) -> Result<Self, DevEnvError> {
        Self::new(&d.name, d.tools.iter().map(Tool::from).collect())
    }

    #[must_use]
    pub fn to_descriptor(&self) -> DevEnvDescriptor {
        DevEnvDescriptor {
            name: self.name.clone(),
            installed: self.installed,
            default: self.default,
            tools: self.tools.iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// The tool declared for `tool_type`, if any.
    #[must_use]
    pub fn tool(&self, tool_type: ToolType) -> Option<&Tool> {
        self.tools.iter().find(|t| t.tool_type == tool_type)
    }

    /// Distinct images referenced by this DevEnv.
    #[must_use]
    pub fn images(&self) -> BTreeSet<ToolImage> {
        self.tools.iter().map(|t| t.image.clone()).collect()
    }

    /// Replace or add the tool for each given type, and drop `removed` types.
    ///
    /// # Errors
    ///
    /// Returns an error when `set` names the same type twice.
    pub fn edit_tools(&mut self, set: Vec<Tool>, removed: &[ToolType]) -> Result<(), DevEnvError> {
        let set = normalize_tools(set)?;
        let mut tools: Vec<Tool> = self
            .tools
            .iter()
            .filter(|t| !removed.contains(&t.tool_type))
            .filter(|t| !set.iter().any(|s| s.tool_type == t.tool_type))
            .cloned()
            .collect();
        tools.extend(set);
        self.tools = normalize_tools(tools)?;
        Ok(())
    }

    /// A copy under a new name that starts uninstalled and non-default.
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid name.
    pub fn duplicate(&self, name: &str) -> Result<Self, DevEnvError> {
        validate_dev_env_name(name)?;
        Ok(Self {
            name: name.to_string(),
            tools: self.tools.clone(),
            installed: false,
            default: false,
        })
    }

    /// Lifecycle state given a fresh classification of this DevEnv's tools.
    #[must_use]
    pub fn state(&self, classification: &Classification) -> DevEnvState {
        match (self.installed, classification.is_complete()) {
            (false, _) => DevEnvState::Uninstalled,
            (true, true) => DevEnvState::Installed,
            (true, false) => DevEnvState::Stale,
        }
    }
}

fn normalize_tools(mut tools: Vec<Tool>) -> Result<Vec<Tool>, DevEnvError> {
    tools.sort_by_key(|t| t.tool_type);
    if let Some(w) = tools.windows(2).find(|w| w[0].tool_type == w[1].tool_type) {
        return Err(DevEnvError::InvalidTool(format!(
            "more than one {} tool",
            w[0].tool_type
        )));
    }
    Ok(tools)
}
