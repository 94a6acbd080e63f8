use std::{sync::Mutex, time::Duration};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::domain::search_hit::SearchHit;

use super::{ExtractionModel, SearchProvider, SearchResponse};

pub fn hit(slug: &str) -> SearchHit {
    let url = match slug.is_empty() {
        true => String::new(),
        false => format!("https://{}.example", slug),
    };

    SearchHit {
        title: format!("{} title", slug),
        snippet: format!("{} snippet", slug),
        url,
    }
}

pub fn hit_with_url(url: &str) -> SearchHit {
    SearchHit {
        title: "Profile".to_string(),
        snippet: "Founder".to_string(),
        url: url.to_string(),
    }
}

/// Answers each query with the first rule whose pattern the query contains.
pub struct ScriptedSearchProvider {
    rules: Vec<(String, SearchResponse)>,
    delays: Vec<(String, Duration)>,
    fallback: SearchResponse,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSearchProvider {
    pub fn new(fallback: SearchResponse) -> Self {
        ScriptedSearchProvider {
            rules: vec![],
            delays: vec![],
            fallback,
            queries: Mutex::new(vec![]),
        }
    }

    pub fn respond(mut self, pattern: &str, response: SearchResponse) -> Self {
        self.rules.push((pattern.to_string(), response));
        self
    }

    pub fn delay(mut self, pattern: &str, delay: Duration) -> Self {
        self.delays.push((pattern.to_string(), delay));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for ScriptedSearchProvider {
    async fn search(&self, query: &str, limit: usize) -> SearchResponse {
        self.queries.lock().unwrap().push(query.to_string());

        let delay = self
            .delays
            .iter()
            .find(|(pattern, _)| query.contains(pattern.as_str()))
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .rules
            .iter()
            .find(|(pattern, _)| query.contains(pattern.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| self.fallback.clone());

        match response {
            SearchResponse::Hits(hits) => {
                SearchResponse::Hits(hits.into_iter().take(limit).collect())
            }
            other => other,
        }
    }
}

pub enum ModelReply {
    Text(String),
    Error(String),
    Panic,
}

/// Returns the same reply to every prompt and records what it was asked.
pub struct ScriptedModel {
    reply: ModelReply,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(reply: ModelReply) -> Self {
        ScriptedModel {
            reply,
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn text(text: &str) -> Self {
        ScriptedModel::new(ModelReply::Text(text.to_string()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &self.reply {
            ModelReply::Text(text) => Ok(text.clone()),
            ModelReply::Error(reason) => Err(anyhow!(reason.clone())),
            ModelReply::Panic => panic!("model client blew up"),
        }
    }
}
