use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for everything the crate fetches, so decorators and test
/// doubles can stand in for the real client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
