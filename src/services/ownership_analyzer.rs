use std::{fmt, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;

use crate::{
    configuration::{PipelineSettings, SearchSettings},
    domain::{
        analysis::{AnalysisResult, CompanyAnalysis},
        company::CompanyQuery,
        extracted_facts::extract_facts,
        search_hit::SearchHit,
    },
};

use super::{
    build_ownership_prompt, enhance_with_founder_linkedin, ExtractionModel, SearchAggregator,
    SearchProvider,
};

pub const UNEXPECTED_FAILURE: &str = "Unexpected analysis failure";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Pending,
    Searching,
    SearchFailed,
    NoResults,
    Extracting,
    Normalized,
    Enhancing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            PipelineStage::Pending => "pending",
            PipelineStage::Searching => "searching",
            PipelineStage::SearchFailed => "search_failed",
            PipelineStage::NoResults => "no_results",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Normalized => "normalized",
            PipelineStage::Enhancing => "enhancing",
            PipelineStage::Done => "done",
        };
        write!(f, "{}", stage)
    }
}

/// Search, prompt, model call, parse, normalize and enhance for one company.
pub struct OwnershipAnalyzer {
    aggregator: SearchAggregator,
    search_provider: Arc<dyn SearchProvider>,
    model: Arc<dyn ExtractionModel>,
    enhance_founder_linkedin: bool,
}

impl OwnershipAnalyzer {
    pub fn new(
        search_provider: Arc<dyn SearchProvider>,
        model: Arc<dyn ExtractionModel>,
        search_settings: &SearchSettings,
        pipeline_settings: &PipelineSettings,
    ) -> Self {
        OwnershipAnalyzer {
            aggregator: SearchAggregator::new(search_provider.clone(), search_settings),
            search_provider,
            model,
            enhance_founder_linkedin: pipeline_settings.enhance_founder_linkedin,
        }
    }

    /// Always returns a well-formed record. Panics inside the pipeline become an
    /// error record for this company only.
    pub async fn analyze(&self, company: &CompanyQuery) -> CompanyAnalysis {
        match AssertUnwindSafe(self.run(company)).catch_unwind().await {
            Ok(analysis) => analysis,
            Err(_) => {
                log::error!(
                    "Analysis panicked for {}, returning error record",
                    company.display_name()
                );
                CompanyAnalysis::new(company, AnalysisResult::failed(UNEXPECTED_FAILURE, ""))
            }
        }
    }

    async fn run(&self, company: &CompanyQuery) -> CompanyAnalysis {
        let display_name = company.display_name();
        log::info!("Analyzing: {}", display_name);
        self.enter(&display_name, PipelineStage::Searching);

        let hits = match self
            .aggregator
            .search_company(&company.name, &company.location)
            .await
        {
            Err(reason) => {
                self.enter(&display_name, PipelineStage::SearchFailed);
                return CompanyAnalysis::new(
                    company,
                    AnalysisResult::failed(
                        format!("Search provider unavailable: {}", reason),
                        "Web search unavailable",
                    ),
                );
            }
            Ok(hits) if hits.is_empty() => {
                self.enter(&display_name, PipelineStage::NoResults);
                log::info!("No search results found for {}", display_name);
                return CompanyAnalysis::new(company, AnalysisResult::no_results());
            }
            Ok(hits) => hits,
        };

        self.enter(&display_name, PipelineStage::Extracting);
        let mut result = match self.extract(company, &hits).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Analysis failed for {}: {:#}", display_name, e);
                return CompanyAnalysis::new(
                    company,
                    AnalysisResult::failed(
                        format!("Analysis failed: {:#}", e),
                        format!("Found {} results but analysis failed", hits.len()),
                    ),
                );
            }
        };
        self.enter(&display_name, PipelineStage::Normalized);

        if self.enhance_founder_linkedin {
            self.enter(&display_name, PipelineStage::Enhancing);
            enhance_with_founder_linkedin(self.search_provider.as_ref(), company, &mut result)
                .await;
        }

        self.enter(&display_name, PipelineStage::Done);
        CompanyAnalysis::new(company, result)
    }

    async fn extract(
        &self,
        company: &CompanyQuery,
        hits: &[SearchHit],
    ) -> anyhow::Result<AnalysisResult> {
        let prompt = build_ownership_prompt(company, hits);
        let text = self.model.generate(&prompt).await?;
        let facts = extract_facts(&text);

        Ok(AnalysisResult::from(facts))
    }

    fn enter(&self, display_name: &str, stage: PipelineStage) {
        log::debug!("{} -> {}", display_name, stage);
    }
}
