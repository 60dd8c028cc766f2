//! Tool image availability classification.
//!
//! Pure functions only. The status of an image is a function of the image
//! reference, the local image set and the registry image set at the time of
//! the call. Statuses are never stored on a DevEnv.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::tool::{Tool, ToolImage};

/// Set of `name:tag` references.
pub type ImageSet = HashSet<String>;

/// Where a tool image can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    LocalOnly,
    RegistryOnly,
    LocalAndRegistry,
    NotAvailable,
}

impl AvailabilityStatus {
    /// Whether the image is present on the local machine.
    ///
    /// This is the two-state view used by health checks.
    #[must_use]
    pub fn is_local(self) -> bool {
        matches!(
            self,
            AvailabilityStatus::LocalOnly | AvailabilityStatus::LocalAndRegistry
        )
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AvailabilityStatus::LocalOnly => "local only",
            AvailabilityStatus::RegistryOnly => "registry only",
            AvailabilityStatus::LocalAndRegistry => "local and registry",
            AvailabilityStatus::NotAvailable => "not available",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a single image against the local and registry sets.
#[must_use]
pub fn classify_image(image: &ToolImage, local: &ImageSet, registry: &ImageSet) -> AvailabilityStatus {
    classify_reference(&image.reference(), local, registry)
}

/// Classify a raw `name:tag` reference.
#[must_use]
pub fn classify_reference(reference: &str, local: &ImageSet, registry: &ImageSet) -> AvailabilityStatus {
    match (local.contains(reference), registry.contains(reference)) {
        (true, true) => AvailabilityStatus::LocalAndRegistry,
        (true, false) => AvailabilityStatus::LocalOnly,
        (false, true) => AvailabilityStatus::RegistryOnly,
        (false, false) => AvailabilityStatus::NotAvailable,
    }
}

/// A tool paired with the status computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAvailability {
    pub tool: Tool,
    pub status: AvailabilityStatus,
}

/// Statuses for every tool of one DevEnv, in tool order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub tools: Vec<ToolAvailability>,
}

impl Classification {
    /// The aggregate list of statuses, in tool order.
    #[must_use]
    pub fn statuses(&self) -> Vec<AvailabilityStatus> {
        self.tools.iter().map(|t| t.status).collect()
    }

    /// Whether every tool image is present locally.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.tools.iter().all(|t| t.status.is_local())
    }

    /// Tools whose image is not present locally.
    pub fn missing(&self) -> impl Iterator<Item = &ToolAvailability> {
        self.tools.iter().filter(|t| !t.status.is_local())
    }

    /// Tools with the given status.
    pub fn with_status(
        &self,
        status: AvailabilityStatus,
    ) -> impl Iterator<Item = &ToolAvailability> {
        self.tools.iter().filter(move |t| t.status == status)
    }
}

/// Classify every tool of a DevEnv.
#[must_use]
pub fn classify_tools(tools: &[Tool], local: &ImageSet, registry: &ImageSet) -> Classification {
    Classification {
        tools: tools
            .iter()
            .map(|tool| ToolAvailability {
                tool: tool.clone(),
                status: classify_image(&tool.image, local, registry),
            })
            .collect(),
    }
}
