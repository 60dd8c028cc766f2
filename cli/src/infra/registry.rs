//! Infrastructure implementations of the `RegistryClient` port.
//!
//! Two backends share one interface and differ only in endpoint shapes:
//! - `HubRegistry`: organization-scoped repository search with paginated
//!   tag listings.
//! - `V2Registry`: the registry `_catalog` and `tags/list` endpoints.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use dem_common::{RegistryDescriptor, RegistryKind};

use crate::application::ports::RegistryClient;
use crate::domain::{DemConfig, RegistryError};
use crate::infra::http::{FetchFailure, get_json};

/// Upper bound on pages per listing. A longer listing is an error rather
/// than a silently shortened result.
pub const MAX_PAGES: usize = 100;

fn registry_error(registry: &str, endpoint: &str, failure: FetchFailure) -> RegistryError {
    match failure {
        FetchFailure::Transport(reason) => RegistryError::Unreachable {
            registry: registry.to_string(),
            reason,
        },
        FetchFailure::Status(status) => RegistryError::Status {
            registry: registry.to_string(),
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        },
        FetchFailure::Decode(reason) => RegistryError::Malformed {
            registry: registry.to_string(),
            endpoint: endpoint.to_string(),
            reason,
        },
    }
}

// ── Hub-style ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HubPage {
    next: Option<String>,
    #[serde(default)]
    results: Vec<HubEntry>,
}

#[derive(Debug, Deserialize)]
struct HubEntry {
    name: String,
}

/// Hub-style registry scoped to one organization namespace.
pub struct HubRegistry {
    name: String,
    namespace: String,
    api: String,
    client: Client,
}

impl HubRegistry {
    pub fn new(name: &str, namespace: &str, api: &str, client: Client) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.trim_matches('/').to_string(),
            api: api.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Names of every entry across all pages starting at `url`.
    async fn collect_pages(&self, start: String) -> Result<Vec<String>, RegistryError> {
        let mut names = Vec::new();
        let mut next = Some(start.clone());
        let mut pages = 0;
        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                return Err(RegistryError::TooManyPages {
                    registry: self.name.clone(),
                    endpoint: start,
                    pages: MAX_PAGES,
                });
            }
            let page: HubPage = get_json(&self.client, &url)
                .await
                .map_err(|f| registry_error(&self.name, &url, f))?;
            names.extend(page.results.into_iter().map(|e| e.name));
            next = page.next.filter(|n| !n.is_empty());
            pages += 1;
        }
        Ok(names)
    }
}

impl RegistryClient for HubRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_repositories(&self) -> Result<Vec<String>, RegistryError> {
        let url = format!(
            "{}/v2/repositories/{}/?page_size=100",
            self.api, self.namespace
        );
        self.collect_pages(url).await
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        let url = format!(
            "{}/v2/repositories/{}/{repository}/tags/?page_size=100",
            self.api, self.namespace
        );
        self.collect_pages(url).await
    }

    fn image_name(&self, repository: &str) -> String {
        format!("{}/{repository}", self.namespace)
    }
}

// ── Generic V2 ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct V2Catalog {
    #[serde(default)]
    repositories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct V2Tags {
    tags: Option<Vec<String>>,
}

/// Registry speaking the plain V2 HTTP API.
pub struct V2Registry {
    name: String,
    base: String,
    host: String,
    client: Client,
}

impl V2Registry {
    pub fn new(name: &str, url: &str, client: Client) -> Self {
        let base = url.trim_end_matches('/').to_string();
        let host = base
            .split_once("://")
            .map_or(base.as_str(), |(_, rest)| rest)
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name: name.to_string(),
            base,
            host,
            client,
        }
    }
}

impl RegistryClient for V2Registry {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_repositories(&self) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/v2/_catalog", self.base);
        let catalog: V2Catalog = get_json(&self.client, &url)
            .await
            .map_err(|f| registry_error(&self.name, &url, f))?;
        Ok(catalog.repositories)
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/v2/{repository}/tags/list", self.base);
        let tags: V2Tags = get_json(&self.client, &url)
            .await
            .map_err(|f| registry_error(&self.name, &url, f))?;
        Ok(tags.tags.unwrap_or_default())
    }

    fn image_name(&self, repository: &str) -> String {
        format!("{}/{repository}", self.host)
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// A configured registry of either kind.
pub enum RegistryBackend {
    Hub(HubRegistry),
    V2(V2Registry),
}

impl RegistryBackend {
    #[must_use]
    pub fn from_descriptor(descriptor: &RegistryDescriptor, config: &DemConfig, client: Client) -> Self {
        let kind = descriptor.effective_kind();
        debug!(registry = %descriptor.name, %kind, "configured registry");
        match kind {
            RegistryKind::Hub => Self::Hub(HubRegistry::new(
                &descriptor.name,
                &descriptor.url,
                &config.registry.hub_api,
                client,
            )),
            RegistryKind::V2 => Self::V2(V2Registry::new(&descriptor.name, &descriptor.url, client)),
        }
    }

    /// One backend per configured registry, sharing `client`.
    #[must_use]
    pub fn all(descriptors: &[RegistryDescriptor], config: &DemConfig, client: &Client) -> Vec<Self> {
        descriptors
            .iter()
            .map(|d| Self::from_descriptor(d, config, client.clone()))
            .collect()
    }
}

impl RegistryClient for RegistryBackend {
    fn name(&self) -> &str {
        match self {
            Self::Hub(r) => r.name(),
            Self::V2(r) => r.name(),
        }
    }

    async fn list_repositories(&self) -> Result<Vec<String>, RegistryError> {
        match self {
            Self::Hub(r) => r.list_repositories().await,
            Self::V2(r) => r.list_repositories().await,
        }
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        match self {
            Self::Hub(r) => r.list_tags(repository).await,
            Self::V2(r) => r.list_tags(repository).await,
        }
    }

    fn image_name(&self, repository: &str) -> String {
        match self {
            Self::Hub(r) => r.image_name(repository),
            Self::V2(r) => r.image_name(repository),
        }
    }
}
