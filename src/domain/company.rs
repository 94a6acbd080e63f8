use serde_json::Value;

pub const MISSING_COMPANY_NAME: &str = "Missing company name";

/// A validated company ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyQuery {
    pub name: String,
    pub location: String,
}

impl CompanyQuery {
    pub fn display_name(&self) -> String {
        match self.location.is_empty() {
            true => self.name.clone(),
            false => format!("{} ({})", self.name, self.location),
        }
    }
}

/// One entry of the inbound `companies` array, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyRecord {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl CompanyRecord {
    pub fn location(&self) -> String {
        [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<&str>>()
            .join(", ")
    }

    pub fn to_query(&self) -> Result<CompanyQuery, &'static str> {
        match &self.name {
            Some(name) => Ok(CompanyQuery {
                name: name.clone(),
                location: self.location(),
            }),
            None => Err(MISSING_COMPANY_NAME),
        }
    }
}

impl From<&Value> for CompanyRecord {
    fn from(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        CompanyRecord {
            name: field("name"),
            city: field("city"),
            state: field("state"),
        }
    }
}
