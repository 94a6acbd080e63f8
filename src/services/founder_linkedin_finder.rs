use crate::domain::{
    analysis::AnalysisResult,
    company::CompanyQuery,
    linkedin::{is_personal_profile_url, to_absolute_profile_url},
};

use super::{search_aggregator::location_suffix, SearchProvider, SearchResponse};

const CANDIDATE_HITS: usize = 3;

pub fn build_founder_linkedin_query(owner: &str, company_name: &str, location: &str) -> String {
    format!(
        r#""{}" "{}"{} site:www.linkedin.com/in"#,
        owner,
        company_name,
        location_suffix(location)
    )
}

/// One narrow search for the owner's personal profile. Any failure yields `None`.
pub async fn find_founder_linkedin(
    provider: &dyn SearchProvider,
    owner: &str,
    company: &CompanyQuery,
) -> Option<String> {
    let query = build_founder_linkedin_query(owner, &company.name, &company.location);

    match provider.search(&query, CANDIDATE_HITS).await {
        SearchResponse::Hits(hits) => hits
            .iter()
            .take(CANDIDATE_HITS)
            .find(|hit| is_personal_profile_url(&hit.url))
            .and_then(|hit| to_absolute_profile_url(&hit.url)),
        SearchResponse::NotFound => None,
        SearchResponse::QueryFailed(reason) | SearchResponse::ProviderUnavailable(reason) => {
            log::warn!(
                "Founder LinkedIn lookup failed for {}: {}",
                company.display_name(),
                reason
            );
            None
        }
    }
}

/// Backfills `founder_linkedin` when the model named an owner but gave no profile.
/// Returns whether the result changed.
pub async fn enhance_with_founder_linkedin(
    provider: &dyn SearchProvider,
    company: &CompanyQuery,
    result: &mut AnalysisResult,
) -> bool {
    let owner = match (&result.owner_founder, &result.founder_linkedin) {
        (Some(owner), None) => owner.clone(),
        _ => return false,
    };

    log::info!(
        "Enhancing {} with targeted LinkedIn search for {}",
        company.display_name(),
        owner
    );

    match find_founder_linkedin(provider, &owner, company).await {
        Some(url) => {
            log::info!("Found targeted LinkedIn: {}", url);
            result.founder_linkedin = Some(url);
            result.confidence = result.confidence.corroborated();
            true
        }
        None => false,
    }
}
