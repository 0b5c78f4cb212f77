use std::time::Duration;

use super::client::HttpClient;
use async_trait::async_trait;

/// Plain unauthenticated client. The public trip archives need nothing
/// more, but they are large single downloads, so the timeout is generous.
pub struct BasicClient(reqwest::Client);

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

impl BasicClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ridership-report/", env!("CARGO_PKG_VERSION")))
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .expect("building http client");
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction_does_not_panic() {
        let _ = BasicClient::new();
        let _ = BasicClient::default();
    }
}
