mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};

/// Downloads a URL into memory, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid url {url}"))?,
    );

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("fetching {url}"))?;

    if !resp.status().is_success() {
        bail!("fetching {url}: server returned {}", resp.status());
    }

    Ok(resp.bytes().await?.to_vec())
}
