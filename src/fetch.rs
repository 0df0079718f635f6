// src/fetch.rs

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::config::Config;

/// Build the one blocking client for the run, with the browser User-Agent and
/// request timeout baked in. The timeout bounds the whole request, so a
/// stalled server fails the run instead of hanging it.
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("building http client")
}

/// Fetch `url` and return the response body as text, decoded per the
/// response's declared encoding. One attempt, no retries.
pub fn fetch_page(client: &Client, url: &str) -> Result<String> {
    debug!(%url, "fetching page");
    client
        .get(url)
        .send()
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("non-success status from {}", url))?
        .text()
        .with_context(|| format!("reading body from {}", url))
}
