use async_trait::async_trait;

use crate::domain::search_hit::SearchHit;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    Hits(Vec<SearchHit>),
    NotFound,
    /// This query failed (timeout, bad status, unreadable page). Other queries may still work.
    QueryFailed(String),
    /// Search is unusable for now: auth rejected, quota exhausted, network unreachable.
    ProviderUnavailable(String),
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> SearchResponse;
}
