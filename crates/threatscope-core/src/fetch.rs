//! Remote-fetch collaborator: retrieving page content is the caller's
//! concern, not the extractors'. A failed fetch surfaces as one error;
//! the extractors are never invoked on absent content.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type FetchResult<T> = Result<T, FetchError>;

const CONNECT_TIMEOUT_SECONDS: u64 = 10;
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Thin HTTP client for pulling intelligence pages and pasted-article
/// sources. No retries, no backpressure; one request, one result.
pub struct IntelFetcher {
    client: Client,
}

impl IntelFetcher {
    pub fn new() -> FetchResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .user_agent(random_user_agent())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page body as text. The URL is validated before any I/O.
    pub async fn fetch_page(&self, url: &str) -> FetchResult<String> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("no host in URL".to_string()))?
            .to_string();

        tracing::debug!(%host, "fetching intel page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

fn random_user_agent() -> String {
    let agents = [
        "Mozilla/5.0 (Windows NT 10.0; rv:128.0) Gecko/20100101 Firefox/128.0",
        "Mozilla/5.0 (Windows NT 10.0; rv:115.0) Gecko/20100101 Firefox/115.0",
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:128.0) Gecko/20100101 Firefox/128.0",
    ];

    let mut rng = rand::rng();
    agents[rng.random_range(0..agents.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_unparsable_url() {
        let fetcher = IntelFetcher::new().unwrap();
        let result = fetcher.fetch_page("not a url at all").await;

        assert!(matches!(result, Err(FetchError::UrlParse(_))));
    }

    #[tokio::test]
    async fn test_rejects_url_without_host() {
        let fetcher = IntelFetcher::new().unwrap();
        let result = fetcher.fetch_page("mailto:intel@example.com").await;

        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_random_user_agent_is_well_formed() {
        assert!(random_user_agent().starts_with("Mozilla/5.0"));
    }
}
