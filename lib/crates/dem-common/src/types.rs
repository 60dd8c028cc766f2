use serde::{Deserialize, Deserializer, Serialize};

/// Tool role a container image fulfils inside a Development Environment.
///
/// Declaration order is the canonical order tools are listed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ToolType {
    #[serde(rename = "build system")]
    BuildSystem,
    #[serde(rename = "toolchain")]
    Toolchain,
    #[serde(rename = "debugger")]
    Debugger,
    #[serde(rename = "deployer")]
    Deployer,
    #[serde(rename = "test framework")]
    TestFramework,
    #[serde(rename = "CI/CD server")]
    CiCdServer,
}

impl ToolType {
    /// Every supported tool type, in canonical order.
    pub const ALL: [ToolType; 6] = [
        ToolType::BuildSystem,
        ToolType::Toolchain,
        ToolType::Debugger,
        ToolType::Deployer,
        ToolType::TestFramework,
        ToolType::CiCdServer,
    ];

    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ToolType::BuildSystem => "build system",
            ToolType::Toolchain => "toolchain",
            ToolType::Debugger => "debugger",
            ToolType::Deployer => "deployer",
            ToolType::TestFramework => "test framework",
            ToolType::CiCdServer => "CI/CD server",
        }
    }

    /// Command-line spelling (`build-system`, `ci-cd-server`, ...).
    #[must_use]
    pub fn cli_name(self) -> &'static str {
        match self {
            ToolType::BuildSystem => "build-system",
            ToolType::Toolchain => "toolchain",
            ToolType::Debugger => "debugger",
            ToolType::Deployer => "deployer",
            ToolType::TestFramework => "test-framework",
            ToolType::CiCdServer => "ci-cd-server",
        }
    }

    /// Parse the command-line spelling.
    #[must_use]
    pub fn from_cli_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.cli_name() == name)
    }
}

impl std::fmt::Display for ToolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One tool declaration of a DevEnv as stored on disk or in a catalog.
///
/// Availability is never part of the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub image_name: String,
    pub image_version: String,
}

/// A DevEnv definition as stored on disk or in a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevEnvDescriptor {
    pub name: String,
    /// Older documents store `"True"` / `"False"` strings here.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub installed: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub default: bool,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

/// Remote registry protocol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RegistryKind {
    /// Docker Hub style search/tags API scoped to one organization.
    Hub,
    /// Generic OCI distribution (`/v2/_catalog`, `/v2/<repo>/tags/list`).
    V2,
}

impl RegistryKind {
    /// Kind implied by a registry URL when the document does not say.
    ///
    /// A URL with a scheme points at a V2 registry; a bare name is a Hub
    /// organization namespace.
    #[must_use]
    pub fn infer(url: &str) -> Self {
        if url.contains("://") {
            RegistryKind::V2
        } else {
            RegistryKind::Hub
        }
    }
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryKind::Hub => f.write_str("hub"),
            RegistryKind::V2 => f.write_str("v2"),
        }
    }
}

/// A configured image registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryDescriptor {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RegistryKind>,
}

impl RegistryDescriptor {
    /// Declared kind, or the kind inferred from the URL.
    #[must_use]
    pub fn effective_kind(&self) -> RegistryKind {
        self.kind.unwrap_or_else(|| RegistryKind::infer(&self.url))
    }
}

/// A configured DevEnv catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogDescriptor {
    pub name: String,
    pub url: String,
}

/// The local `dev_env.json` document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevEnvDocument {
    pub version: String,
    #[serde(default)]
    pub registries: Vec<RegistryDescriptor>,
    #[serde(default)]
    pub catalogs: Vec<CatalogDescriptor>,
    #[serde(default)]
    pub development_environments: Vec<DevEnvDescriptor>,
}

/// A remote catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogDocument {
    pub version: String,
    #[serde(default)]
    pub development_environments: Vec<DevEnvDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(s) => match s.as_str() {
            "True" | "true" => Ok(true),
            "False" | "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got '{other}'"
            ))),
        },
    }
}
