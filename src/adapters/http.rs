use crate::adapters::html::flatten_page;
use crate::domain::model::FetchedPage;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "sysconf-tracker-bot";

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// Fetches conference pages over HTTP and flattens them to text.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::FetchError {
                url: url.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        let (text, cfp_links) = flatten_page(&body, &final_url);

        tracing::debug!(
            "Fetched {} ({} bytes, {} lines, {} CFP links)",
            final_url,
            body.len(),
            text.lines().count(),
            cfp_links.len()
        );

        Ok(FetchedPage {
            url: url.to_string(),
            text,
            cfp_links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(build_client(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_fetch_flattens_html() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/cfp");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><body><p>Submission deadline: 2026-05-01</p><a href=\"cfp2.html\">Call for Papers</a></body></html>");
        });

        let page = fetcher().fetch(&server.url("/cfp")).await.unwrap();

        page_mock.assert();
        assert_eq!(page.url, server.url("/cfp"));
        assert_eq!(page.text, "Submission deadline: 2026-05-01\nCall for Papers");
        assert_eq!(page.cfp_links, vec![server.url("/cfp2.html")]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_error() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let result = fetcher().fetch(&server.url("/missing")).await;

        page_mock.assert();
        assert!(matches!(result, Err(TrackerError::FetchError { .. })));
    }
}
