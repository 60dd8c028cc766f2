//! Infrastructure implementation of the `CatalogFetcher` port.

use dem_common::{CatalogDescriptor, CatalogDocument};
use reqwest::Client;
use tracing::debug;

use crate::application::ports::CatalogFetcher;
use crate::domain::CatalogError;
use crate::infra::http::{FetchFailure, get_json};

/// Downloads catalog documents over HTTP(S).
pub struct HttpCatalogFetcher {
    client: Client,
}

impl HttpCatalogFetcher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self, catalog: &CatalogDescriptor) -> Result<CatalogDocument, CatalogError> {
        debug!(catalog = %catalog.name, url = %catalog.url, "fetching catalog");
        get_json(&self.client, &catalog.url)
            .await
            .map_err(|failure| match failure {
                FetchFailure::Transport(reason) => CatalogError::Unreachable {
                    name: catalog.name.clone(),
                    reason,
                },
                FetchFailure::Status(status) => CatalogError::Status {
                    name: catalog.name.clone(),
                    status: status.as_u16(),
                },
                FetchFailure::Decode(reason) => CatalogError::Corrupt {
                    name: catalog.name.clone(),
                    reason,
                },
            })
    }
}
