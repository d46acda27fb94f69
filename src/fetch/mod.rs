//! HTTP plumbing: the transport trait, the session-header decorator, and
//! small typed GET helpers the portal client builds on.

mod basic;
mod client;
mod session;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use session::SessionHeaders;

use anyhow::{Context, Result, ensure};
use serde::de::DeserializeOwned;

/// Issues a GET and returns the body as text. Any non-success status is an
/// error; callers decide whether that kills the run or just one fetch.
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    ensure!(status.is_success(), "GET {url} returned {status}");

    Ok(resp.text().await?)
}

/// Issues a GET and deserializes the body as JSON.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).with_context(|| format!("GET {url} returned a non-JSON body"))
}
