use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for HTTP execution so the archive fetch can be faked in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
