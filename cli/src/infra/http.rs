//! Shared HTTP plumbing for the registry and catalog clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Build the client every remote call of one command goes through.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("dem/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("cannot build HTTP client")
}

/// Why a JSON GET did not produce a value.
#[derive(Debug)]
pub enum FetchFailure {
    /// Transport error, including timeouts.
    Transport(String),
    /// Any status other than 200.
    Status(StatusCode),
    /// Body was not the expected JSON.
    Decode(String),
}

/// GET `url` and decode a JSON body. Only `200 OK` is success.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchFailure> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;
    if response.status() != StatusCode::OK {
        return Err(FetchFailure::Status(response.status()));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| FetchFailure::Decode(e.to_string()))
}
