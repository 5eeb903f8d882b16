use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const MAX_ATTEMPTS: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, String>;
}

/// HTTP fetcher over a shared reqwest client. Transport errors are retried a
/// few times; HTTP error statuses are not (a 404 note page stays a 404).
/// Body decoding follows the response charset header, which the tariff site
/// sets on its legacy-encoded pages.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, String> {
        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match self.client.get(url).send().await {
                Ok(response) => break response,
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!("Retrying {url} after network error (attempt {attempt}): {e}");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(format!("Network error fetching {url}: {e}")),
            }
        };

        if !response.status().is_success() {
            return Err(format!(
                "HTTP error {} fetching {url}",
                response.status().as_u16()
            ));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Error reading response body from {url}: {e}"))
    }
}
