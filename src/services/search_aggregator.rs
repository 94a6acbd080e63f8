use std::{collections::HashSet, sync::Arc, time::Duration};

use rand::Rng;

use crate::{configuration::SearchSettings, domain::search_hit::SearchHit};

use super::{SearchProvider, SearchResponse};

pub fn location_suffix(location: &str) -> String {
    match location.is_empty() {
        true => String::new(),
        false => format!(" {}", location),
    }
}

pub fn build_company_search_queries(
    company_name: &str,
    location: &str,
    owner_linkedin_query: bool,
) -> Vec<String> {
    let suffix = location_suffix(location);

    let mut queries = vec![
        format!("{}{} founder CEO owner", company_name, suffix),
        format!("{}{} LinkedIn company owner", company_name, suffix),
        format!("{}{} about team leadership", company_name, suffix),
    ];
    if owner_linkedin_query {
        queries.push(format!(r#""{}"{} owner LinkedIn"#, company_name, suffix));
    }

    queries
}

pub struct SearchAggregator {
    provider: Arc<dyn SearchProvider>,
    results_per_query: usize,
    max_results: usize,
    query_delay: Duration,
    owner_linkedin_query: bool,
}

impl SearchAggregator {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: &SearchSettings) -> Self {
        SearchAggregator {
            provider,
            results_per_query: settings.results_per_query,
            max_results: settings.max_results,
            query_delay: Duration::from_millis(settings.query_delay_ms),
            owner_linkedin_query: settings.owner_linkedin_query,
        }
    }

    /// Runs every company query and merges the hits, first URL occurrence wins.
    /// Returns `Err(reason)` only when the provider itself is unusable.
    pub async fn search_company(
        &self,
        company_name: &str,
        location: &str,
    ) -> Result<Vec<SearchHit>, String> {
        let queries =
            build_company_search_queries(company_name, location, self.owner_linkedin_query);

        let mut hits: Vec<SearchHit> = vec![];
        let mut seen_urls = HashSet::new();

        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }

            match self.provider.search(query, self.results_per_query).await {
                SearchResponse::Hits(found) => {
                    for hit in found {
                        if !hit.url.is_empty() && seen_urls.insert(hit.url.clone()) {
                            hits.push(hit);
                        }
                    }
                }
                SearchResponse::NotFound => {
                    log::info!("Found no results on query: {}", query);
                }
                SearchResponse::QueryFailed(reason) => {
                    log::warn!("Search query failed: {}. Error: {}", query, reason);
                }
                SearchResponse::ProviderUnavailable(reason) => {
                    log::error!(
                        "Search provider unavailable on query: {}. Error: {}",
                        query,
                        reason
                    );
                    return Err(reason);
                }
            }
        }

        hits.truncate(self.max_results);
        Ok(hits)
    }

    async fn pause(&self) {
        if self.query_delay.is_zero() {
            return;
        }
        let jitter: f64 = rand::thread_rng().gen_range(0.8..1.2);
        tokio::time::sleep(self.query_delay.mul_f64(jitter)).await;
    }
}
