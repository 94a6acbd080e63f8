use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

use crate::{configuration::SearchSettings, domain::search_hit::SearchHit};

use super::{SearchProvider, SearchResponse};

const DUCKDUCKGO_ORIGIN: &str = "https://duckduckgo.com";

pub struct DuckDuckGoScraper {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct DuckDuckGoQuery<'a> {
    q: &'a str,
}

impl DuckDuckGoScraper {
    pub fn new(settings: &SearchSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(fake_user_agent::get_rua())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(DuckDuckGoScraper {
            client,
            url: settings.base_url.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoScraper {
    async fn search(&self, query: &str, limit: usize) -> SearchResponse {
        let res = match self
            .client
            .post(&self.url)
            .form(&DuckDuckGoQuery { q: query })
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) if e.is_timeout() => {
                return SearchResponse::QueryFailed(format!("Search timed out: {}", e))
            }
            Err(e) if e.is_connect() => {
                return SearchResponse::ProviderUnavailable(format!("Network unreachable: {}", e))
            }
            Err(e) => return SearchResponse::QueryFailed(format!("Search request failed: {}", e)),
        };

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                SearchResponse::ProviderUnavailable(format!(
                    "Authentication rejected (HTTP {})",
                    res.status().as_u16()
                ))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                SearchResponse::ProviderUnavailable("Quota exhausted (HTTP 429)".to_string())
            }
            // Throttled clients get a 202 challenge page instead of results.
            StatusCode::ACCEPTED => {
                SearchResponse::ProviderUnavailable("Rate limited (HTTP 202)".to_string())
            }
            status if !status.is_success() => {
                SearchResponse::QueryFailed(format!("Unexpected status HTTP {}", status.as_u16()))
            }
            _ => match res.text().await {
                Ok(html_content) => parse_result_page(&html_content, limit),
                Err(e) => SearchResponse::QueryFailed(format!(
                    "Failed to read search results page: {}",
                    e
                )),
            },
        }
    }
}

/// Reads the first `limit` result blocks of a DuckDuckGo HTML page. Blocks without
/// both a title link and a snippet are skipped.
pub fn parse_result_page(html_content: &str, limit: usize) -> SearchResponse {
    let (Ok(result_selector), Ok(title_selector), Ok(snippet_selector)) = (
        Selector::parse("div.result"),
        Selector::parse("a.result__a"),
        Selector::parse("a.result__snippet"),
    ) else {
        return SearchResponse::QueryFailed("Invalid result selectors".to_string());
    };

    let html_document = Html::parse_document(html_content);

    let hits: Vec<SearchHit> = html_document
        .select(&result_selector)
        .take(limit)
        .filter_map(|result| {
            let title_tag = result.select(&title_selector).next()?;
            let snippet_tag = result.select(&snippet_selector).next()?;
            let url = title_tag
                .value()
                .attr("href")
                .map(unwrap_redirect_url)
                .unwrap_or_default();

            Some(SearchHit {
                title: tag_text(title_tag),
                snippet: tag_text(snippet_tag),
                url,
            })
        })
        .collect();

    match hits.is_empty() {
        true => SearchResponse::NotFound,
        false => SearchResponse::Hits(hits),
    }
}

fn tag_text(tag: ElementRef) -> String {
    tag.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" ")
}

/// DuckDuckGo wraps result links as `//duckduckgo.com/l/?uddg=<target>`.
fn unwrap_redirect_url(href: &str) -> String {
    let redirect = Url::parse(DUCKDUCKGO_ORIGIN)
        .and_then(|origin| origin.join(href))
        .ok()
        .filter(|u| u.host_str().is_some_and(|h| h.ends_with("duckduckgo.com")))
        .filter(|u| u.path().starts_with("/l/"));

    redirect
        .and_then(|u| {
            u.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or_else(|| href.to_string())
}
