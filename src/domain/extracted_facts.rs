use serde_json::{Map, Value};

pub const PARSE_FAILURE_SOURCES: &str = "Failed to parse response";

/// Loosely typed object recovered from model output. Keys may be missing and values
/// may carry the wrong type; `AnalysisResult::from` turns it into the strict shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFacts(pub Map<String, Value>);

impl ExtractedFacts {
    pub fn unparsable() -> Self {
        let mut facts = Map::new();
        facts.insert("owner_founder".to_string(), Value::Null);
        facts.insert("parent_company".to_string(), Value::Null);
        facts.insert("confidence".to_string(), Value::from("low"));
        facts.insert(
            "sources_found".to_string(),
            Value::from(PARSE_FAILURE_SOURCES),
        );
        ExtractedFacts(facts)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Recovers a JSON object from model text: the whole text, then the text with
/// markdown fence lines removed, then the span from the first `{` to the last `}`.
pub fn extract_facts(text: &str) -> ExtractedFacts {
    if let Some(facts) = parse_object(text) {
        return facts;
    }

    let trimmed = text.trim();
    let cleaned = match trimmed.starts_with("```") {
        true => trimmed
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<&str>>()
            .join("\n"),
        false => trimmed.to_string(),
    };

    if let Some(facts) = parse_object(&cleaned) {
        return facts;
    }

    let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => parse_object(&cleaned[start..=end]),
        _ => None,
    };

    candidate.unwrap_or_else(|| {
        log::warn!(
            "Could not recover a JSON object from model response ({} chars)",
            text.len()
        );
        ExtractedFacts::unparsable()
    })
}

fn parse_object(text: &str) -> Option<ExtractedFacts> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(ExtractedFacts(map)),
        _ => None,
    }
}
