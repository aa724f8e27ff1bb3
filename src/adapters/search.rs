//! Web search providers used to discover CFP pages.

use crate::domain::ports::SearchProvider;
use crate::utils::error::{Result, TrackerError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

pub const DUCKDUCKGO_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
pub const DBLP_ENDPOINT: &str = "https://dblp.org/search";
pub const SEARCH_ENGINES: &[&str] = &["duckduckgo", "dblp", "none"];

static DDG_RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("result link selector"));

static ANY_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector"));

/// DuckDuckGo wraps results as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let parsed = Url::parse(&absolute).ok()?;

    let target = parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
        .unwrap_or(absolute);

    target.starts_with("http").then_some(target)
}

fn parse_duckduckgo_results(body: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(body);
    document
        .select(&DDG_RESULT_LINK)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(unwrap_redirect)
        .take(max_results)
        .collect()
}

fn parse_dblp_results(body: &str, base: &Url, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(body);
    let mut results: Vec<String> = Vec::new();

    for href in document
        .select(&ANY_LINK)
        .filter_map(|link| link.value().attr("href"))
    {
        if !href.contains("conference") && !href.contains("symposium") {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            continue;
        };
        let resolved = resolved.to_string();
        if !results.contains(&resolved) {
            results.push(resolved);
        }
        if results.len() >= max_results {
            break;
        }
    }

    results
}

pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(client: Client, endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results,
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TrackerError::SearchError {
                engine: self.name().to_string(),
                message: format!("HTTP status {}", response.status()),
            });
        }

        let body = response.text().await?;
        Ok(parse_duckduckgo_results(&body, self.max_results))
    }
}

/// Searches dblp and keeps links that point at conference or symposium pages.
pub struct DblpSearch {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl DblpSearch {
    pub fn new(client: Client, endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results,
        }
    }
}

#[async_trait]
impl SearchProvider for DblpSearch {
    fn name(&self) -> &str {
        "dblp"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let url = Url::parse_with_params(&self.endpoint, &[("q", query)]).map_err(|e| {
            TrackerError::SearchError {
                engine: self.name().to_string(),
                message: format!("invalid endpoint: {}", e),
            }
        })?;

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(TrackerError::SearchError {
                engine: self.name().to_string(),
                message: format!("HTTP status {}", response.status()),
            });
        }

        let body = response.text().await?;
        Ok(parse_dblp_results(&body, &url, self.max_results))
    }
}

/// Used when web search is disabled.
pub struct NoSearch;

#[async_trait]
impl SearchProvider for NoSearch {
    fn name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn search(&self, _query: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

pub fn build_search_provider(
    engine: &str,
    endpoint: Option<&str>,
    max_results: usize,
    client: Client,
) -> Result<Box<dyn SearchProvider>> {
    match engine {
        "duckduckgo" => Ok(Box::new(DuckDuckGoSearch::new(
            client,
            endpoint.unwrap_or(DUCKDUCKGO_ENDPOINT),
            max_results,
        ))),
        "dblp" => Ok(Box::new(DblpSearch::new(
            client,
            endpoint.unwrap_or(DBLP_ENDPOINT),
            max_results,
        ))),
        "none" => Ok(Box::new(NoSearch)),
        other => Err(TrackerError::InvalidConfigValueError {
            field: "search.engine".to_string(),
            value: other.to_string(),
            reason: format!("Valid values: {}", SEARCH_ENGINES.join(", ")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_unwrap_redirect() {
        assert_eq!(
            unwrap_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.sosp.org%2Fcfp&rut=abc")
                .as_deref(),
            Some("https://www.sosp.org/cfp")
        );
        assert_eq!(
            unwrap_redirect("https://www.usenix.org/conference/osdi26").as_deref(),
            Some("https://www.usenix.org/conference/osdi26")
        );
        assert_eq!(unwrap_redirect("/relative/path"), None);
    }

    #[test]
    fn test_parse_duckduckgo_results() {
        let body = r#"<div class="result"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.org%2F">A</a></div>
<div class="result"><a class="result__a" href="https://b.org/cfp">B</a></div>
<div class="result"><a class="result__a" href="https://c.org/">C</a></div>
<a href="https://ignored.org/">not a result</a>"#;
        assert_eq!(
            parse_duckduckgo_results(body, 2),
            vec!["https://a.org/", "https://b.org/cfp"]
        );
    }

    #[tokio::test]
    async fn test_dblp_search_keeps_conference_links() {
        let server = MockServer::start();
        let search_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "OSDI 2026 call for papers");
            then.status(200).body(
                r#"<a href="https://dblp.org/db/conf/osdi/index.html">x</a>
<a href="https://www.usenix.org/conference/osdi26">OSDI</a>
<a href="/symposium/osdi">rel</a>"#,
            );
        });

        let provider = DblpSearch::new(Client::new(), server.url("/search"), 5);
        let results = provider.search("OSDI 2026 call for papers").await.unwrap();

        search_mock.assert();
        assert_eq!(
            results,
            vec![
                "https://www.usenix.org/conference/osdi26".to_string(),
                server.url("/symposium/osdi"),
            ]
        );
    }

    #[tokio::test]
    async fn test_duckduckgo_failure_is_search_error() {
        let server = MockServer::start();
        let search_mock = server.mock(|when, then| {
            when.method(POST).path("/html/");
            then.status(503);
        });

        let provider = DuckDuckGoSearch::new(Client::new(), server.url("/html/"), 5);
        let result = provider.search("SOSP 2026 call for papers").await;

        search_mock.assert();
        assert!(matches!(result, Err(TrackerError::SearchError { .. })));
    }

    #[test]
    fn test_unknown_engine_rejected() {
        assert!(build_search_provider("bing", None, 5, Client::new()).is_err());
        assert!(build_search_provider("none", None, 5, Client::new()).is_ok());
    }
}
