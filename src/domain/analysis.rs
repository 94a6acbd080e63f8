use serde::Serialize;
use serde_json::Value;

use super::{
    company::{CompanyQuery, CompanyRecord},
    extracted_facts::ExtractedFacts,
};

const PLACEHOLDERS: [&str; 5] = ["", "none", "null", "n/a", "na"];

pub const NO_RESULTS_SOURCES: &str = "No web results found (0 search hits)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    PrivatelyHeldIndividual,
    StartupVentureBacked,
    CorporateSubsidiary,
    PubliclyListed,
    PrivateEquityOwned,
    GovernmentEntity,
    NonProfit,
    Other,
}

impl OwnershipType {
    pub const ALL: [OwnershipType; 8] = [
        OwnershipType::PrivatelyHeldIndividual,
        OwnershipType::StartupVentureBacked,
        OwnershipType::CorporateSubsidiary,
        OwnershipType::PubliclyListed,
        OwnershipType::PrivateEquityOwned,
        OwnershipType::GovernmentEntity,
        OwnershipType::NonProfit,
        OwnershipType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipType::PrivatelyHeldIndividual => "privately_held_individual",
            OwnershipType::StartupVentureBacked => "startup_venture_backed",
            OwnershipType::CorporateSubsidiary => "corporate_subsidiary",
            OwnershipType::PubliclyListed => "publicly_listed",
            OwnershipType::PrivateEquityOwned => "private_equity_owned",
            OwnershipType::GovernmentEntity => "government_entity",
            OwnershipType::NonProfit => "non_profit",
            OwnershipType::Other => "other",
        }
    }

    /// Unknown or missing labels collapse to `Other`.
    pub fn from_label(label: Option<&Value>) -> Self {
        let label = match label {
            Some(Value::String(s)) => s.trim().to_lowercase(),
            _ => return OwnershipType::Other,
        };

        OwnershipType::ALL
            .into_iter()
            .find(|t| t.as_str() == label)
            .unwrap_or(OwnershipType::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Unknown or missing labels collapse to `Low`.
    pub fn from_label(label: Option<&Value>) -> Self {
        match label {
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "high" => Confidence::High,
                "medium" => Confidence::Medium,
                _ => Confidence::Low,
            },
            _ => Confidence::Low,
        }
    }

    /// A corroborating profile link lifts low to medium. High is left alone.
    pub fn corroborated(self) -> Self {
        match self {
            Confidence::High => Confidence::High,
            Confidence::Medium | Confidence::Low => Confidence::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub owner_founder: Option<String>,
    pub company_linkedin: Option<String>,
    pub founder_linkedin: Option<String>,
    pub parent_company: Option<String>,
    pub affiliated_companies: Vec<String>,
    pub ownership_type: OwnershipType,
    pub confidence: Confidence,
    pub sources_found: String,
    pub error: Option<String>,
}

impl AnalysisResult {
    /// The one shape every failure branch reports.
    pub fn failed(reason: impl Into<String>, sources_found: impl Into<String>) -> Self {
        AnalysisResult {
            owner_founder: None,
            company_linkedin: None,
            founder_linkedin: None,
            parent_company: None,
            affiliated_companies: vec![],
            ownership_type: OwnershipType::Other,
            confidence: Confidence::Low,
            sources_found: sources_found.into(),
            error: Some(reason.into()),
        }
    }

    pub fn no_results() -> Self {
        AnalysisResult {
            error: None,
            ..AnalysisResult::failed("", NO_RESULTS_SOURCES)
        }
    }
}

impl From<&ExtractedFacts> for AnalysisResult {
    fn from(facts: &ExtractedFacts) -> Self {
        let affiliated_companies = match facts.get("affiliated_companies") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| nullify(Some(item)))
                .collect(),
            _ => vec![],
        };

        let sources_found = match facts.get("sources_found") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };

        AnalysisResult {
            owner_founder: nullify(facts.get("owner_founder")),
            company_linkedin: nullify(facts.get("company_linkedin")),
            founder_linkedin: nullify(facts.get("founder_linkedin")),
            parent_company: nullify(facts.get("parent_company")),
            affiliated_companies,
            ownership_type: OwnershipType::from_label(facts.get("ownership_type")),
            confidence: Confidence::from_label(facts.get("confidence")),
            sources_found,
            error: None,
        }
    }
}

impl From<ExtractedFacts> for AnalysisResult {
    fn from(facts: ExtractedFacts) -> Self {
        AnalysisResult::from(&facts)
    }
}

impl From<&AnalysisResult> for ExtractedFacts {
    fn from(result: &AnalysisResult) -> Self {
        match serde_json::to_value(result) {
            Ok(Value::Object(map)) => ExtractedFacts(map),
            _ => ExtractedFacts::default(),
        }
    }
}

fn nullify(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            match PLACEHOLDERS.contains(&trimmed.to_lowercase().as_str()) {
                true => None,
                false => Some(trimmed.to_string()),
            }
        }
        _ => None,
    }
}

/// Final per-company record: the input identity plus the flattened analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyAnalysis {
    pub company: Option<String>,
    pub location: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl CompanyAnalysis {
    pub fn new(company: &CompanyQuery, result: AnalysisResult) -> Self {
        CompanyAnalysis {
            company: Some(company.name.clone()),
            location: company.location.clone(),
            result,
        }
    }

    pub fn rejected(record: &CompanyRecord, reason: &str) -> Self {
        CompanyAnalysis {
            company: record.name.clone(),
            location: record.location(),
            result: AnalysisResult::failed(reason, ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn normalize(value: Value) -> AnalysisResult {
        match value {
            Value::Object(map) => AnalysisResult::from(ExtractedFacts(map)),
            _ => panic!("test input must be an object"),
        }
    }

    fn renormalize(result: &AnalysisResult) -> AnalysisResult {
        AnalysisResult::from(ExtractedFacts::from(result))
    }

    #[test]
    fn placeholders_become_null() {
        let result = normalize(json!({
            "owner_founder": "N/A",
            "company_linkedin": " none ",
            "founder_linkedin": "",
            "parent_company": "NULL",
        }));

        assert_eq!(result.owner_founder, None);
        assert_eq!(result.company_linkedin, None);
        assert_eq!(result.founder_linkedin, None);
        assert_eq!(result.parent_company, None);

        let result = normalize(json!({"owner_founder": "na"}));
        assert_eq!(result.owner_founder, None);
    }

    #[test]
    fn well_formed_object_passes_through() {
        let result = normalize(json!({
            "owner_founder": "Jane Doe",
            "company_linkedin": "https://www.linkedin.com/company/acme",
            "founder_linkedin": "https://www.linkedin.com/in/janedoe",
            "parent_company": null,
            "affiliated_companies": ["Doe Ventures"],
            "ownership_type": " Startup_Venture_Backed ",
            "confidence": "HIGH",
            "sources_found": "Jane Doe, CEO - https://acme.example/about",
        }));

        assert_eq!(result.owner_founder.as_deref(), Some("Jane Doe"));
        assert_eq!(
            result.founder_linkedin.as_deref(),
            Some("https://www.linkedin.com/in/janedoe")
        );
        assert_eq!(result.affiliated_companies, vec!["Doe Ventures"]);
        assert_eq!(result.ownership_type, OwnershipType::StartupVentureBacked);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.error, None);
    }

    #[test]
    fn enums_collapse_to_defaults() {
        let result = normalize(json!({"ownership_type": "family business", "confidence": "very sure"}));
        assert_eq!(result.ownership_type, OwnershipType::Other);
        assert_eq!(result.confidence, Confidence::Low);

        let result = normalize(json!({"ownership_type": 7, "confidence": ["high"]}));
        assert_eq!(result.ownership_type, OwnershipType::Other);
        assert_eq!(result.confidence, Confidence::Low);

        let result = normalize(json!({}));
        assert_eq!(result.ownership_type, OwnershipType::Other);
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.affiliated_companies.is_empty());
        assert_eq!(result.sources_found, "");
    }

    #[test]
    fn affiliated_companies_is_always_a_list() {
        for value in [json!("Acme Holdings"), json!(null), json!({"a": 1}), json!(3)] {
            let result = normalize(json!({"affiliated_companies": value}));
            assert!(result.affiliated_companies.is_empty());
        }

        let result = normalize(json!({"affiliated_companies": ["Acme Holdings", 4, "n/a", " Beta LLC "]}));
        assert_eq!(result.affiliated_companies, vec!["Acme Holdings", "Beta LLC"]);
    }

    #[test]
    fn sources_found_is_opaque_text() {
        let result = normalize(json!({"sources_found": "- Jane Doe, founder\n- https://acme.example "}));
        assert_eq!(result.sources_found, "- Jane Doe, founder\n- https://acme.example ");

        let result = normalize(json!({"sources_found": ["a", "b"]}));
        assert_eq!(result.sources_found, r#"["a","b"]"#);
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            json!({}),
            json!({"owner_founder": "  John Smith ", "confidence": "Medium", "ownership_type": "NON_PROFIT"}),
            json!({"owner_founder": 12, "affiliated_companies": "x", "sources_found": {"k": "v"}}),
            json!({"company_linkedin": "None", "affiliated_companies": [" A ", "", null, "B"], "error": "injected"}),
            json!({"owner_founder": null, "parent_company": "Parent Corp", "confidence": "high"}),
        ];

        for input in inputs {
            let once = normalize(input);
            let twice = renormalize(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn model_cannot_inject_error() {
        let result = normalize(json!({"error": "boom"}));
        assert_eq!(result.error, None);
    }

    #[test]
    fn corroboration_never_reaches_high_or_downgrades() {
        assert_eq!(Confidence::Low.corroborated(), Confidence::Medium);
        assert_eq!(Confidence::Medium.corroborated(), Confidence::Medium);
        assert_eq!(Confidence::High.corroborated(), Confidence::High);
    }

    #[test]
    fn company_analysis_serializes_flat() {
        let company = CompanyQuery {
            name: "Acme Co".to_string(),
            location: "Austin, TX".to_string(),
        };
        let value = serde_json::to_value(CompanyAnalysis::new(&company, AnalysisResult::no_results())).unwrap();

        assert_eq!(value["company"], json!("Acme Co"));
        assert_eq!(value["location"], json!("Austin, TX"));
        assert_eq!(value["owner_founder"], Value::Null);
        assert_eq!(value["affiliated_companies"], json!([]));
        assert_eq!(value["ownership_type"], json!("other"));
        assert_eq!(value["confidence"], json!("low"));
        assert_eq!(value["sources_found"], json!(NO_RESULTS_SOURCES));
        assert_eq!(value["error"], Value::Null);
    }

    #[test]
    fn rejected_record_keeps_identity() {
        let record = CompanyRecord {
            name: None,
            city: Some("Austin".to_string()),
            state: None,
        };
        let analysis = CompanyAnalysis::rejected(&record, "Missing company name");

        assert_eq!(analysis.company, None);
        assert_eq!(analysis.location, "Austin");
        assert_eq!(analysis.result.error.as_deref(), Some("Missing company name"));
        assert_eq!(analysis.result.confidence, Confidence::Low);
    }
}
