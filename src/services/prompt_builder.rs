use itertools::Itertools;

use crate::domain::{analysis::OwnershipType, company::CompanyQuery, search_hit::SearchHit};

pub const NO_RESULTS_MARKER: &str = "No search results found. Unable to verify.";

pub fn build_ownership_prompt(company: &CompanyQuery, hits: &[SearchHit]) -> String {
    let results_text = match hits.is_empty() {
        true => NO_RESULTS_MARKER.to_string(),
        false => hits
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "Result {}:\nTitle: {}\nSnippet: {}\nURL: {}",
                    i + 1,
                    hit.title,
                    hit.snippet,
                    hit.url
                )
            })
            .join("\n\n"),
    };

    let ownership_types = OwnershipType::ALL
        .iter()
        .map(|t| format!("'{}'", t.as_str()))
        .join(", ");

    format!(
        r#"Analyze the web search results for the company: {company_context}.

## Search Results:
{results_text}

## Instructions:
Based ONLY on the provided search results, extract the following information into a valid JSON object. Do not use any outside knowledge. Focus heavily on owner/founder identification and their personal LinkedIn (/in/ URLs) over company pages (/company/).

1.  `owner_founder`: Identify the primary founder, CEO, or owner.
2.  `company_linkedin` & `founder_linkedin`: Find any LinkedIn profile URLs. Use /company/... for company_linkedin; reserve /in/... strictly for founder_linkedin (the founder's personal profile).
3.  `parent_company`: If it is a subsidiary, name the parent company.
4.  `affiliated_companies`: List other organizations the key people are associated with. This MUST be an array `[]` if none are found.
5.  `ownership_type`: Classify as one of {ownership_types}.
6.  `confidence`: Use strict rules:
    - 'high': ONLY if the owner's name is in 2+ distinct sources AND a personal LinkedIn URL is found.
    - 'medium': If the owner is in exactly 1 source OR the personal LinkedIn URL is missing.
    - 'low': If no owner is found or the sources conflict.
7.  `sources_found`: Summarize the top 3 most critical findings. Each point must state a key fact, focusing on a person's name and their role (like CEO or Founder), followed by the source URL. Do not number the sources (avoid 'Source 1', '1.').

## JSON Output Format:
Respond with a single JSON object containing these exact keys: `owner_founder`, `company_linkedin`, `founder_linkedin`, `parent_company`, `affiliated_companies`, `ownership_type`, `confidence`, `sources_found`."#,
        company_context = company.display_name(),
        results_text = results_text,
        ownership_types = ownership_types,
    )
}
