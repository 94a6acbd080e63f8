use config::ConfigError;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub search: SearchSettings,
    pub model: ModelSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Upper bound on an inbound request body.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_payload_bytes: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub results_per_query: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_results: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub query_delay_ms: u64,
    /// Adds the quoted `"<name>" owner LinkedIn` query to the aggregation run.
    pub owner_linkedin_query: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ModelSettings {
    pub api_key: String,
    pub api_base: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub temperature: f32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

impl ModelSettings {
    pub fn model_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct PipelineSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pool_size: usize,
    /// Runs the targeted founder LinkedIn lookup when the model found an owner but no profile.
    pub enhance_founder_linkedin: bool,
}

impl Settings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "Missing model API key. Set APP_MODEL__API_KEY.".to_string(),
            ));
        }
        if self.application.max_payload_bytes == 0 {
            return Err(ConfigError::Message(
                "application.max_payload_bytes must be at least 1".to_string(),
            ));
        }
        if self.pipeline.pool_size == 0 {
            return Err(ConfigError::Message(
                "pipeline.pool_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: &str, pool_size: usize) -> Settings {
        Settings {
            application: ApplicationSettings {
                port: 8000,
                host: "127.0.0.1".to_string(),
                max_payload_bytes: 16 * 1024 * 1024,
            },
            search: SearchSettings {
                base_url: "https://html.duckduckgo.com/html/".to_string(),
                timeout_secs: 10,
                results_per_query: 5,
                max_results: 12,
                query_delay_ms: 0,
                owner_linkedin_query: true,
            },
            model: ModelSettings {
                api_key: api_key.to_string(),
                api_base: "https://api.openai.com/v1".to_string(),
                name: None,
                temperature: 0.1,
                timeout_secs: 60,
            },
            pipeline: PipelineSettings {
                pool_size,
                enhance_founder_linkedin: true,
            },
        }
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(settings("   ", 3).validate().is_err());
        assert!(settings("sk-test", 3).validate().is_ok());
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(settings("sk-test", 0).validate().is_err());
    }

    #[test]
    fn zero_payload_limit_is_rejected() {
        let mut settings = settings("sk-test", 3);
        settings.application.max_payload_bytes = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn model_name_falls_back_to_default() {
        let mut settings = settings("sk-test", 3);
        assert_eq!(settings.model.model_name(), DEFAULT_MODEL);

        settings.model.name = Some(" ".to_string());
        assert_eq!(settings.model.model_name(), DEFAULT_MODEL);

        settings.model.name = Some("gpt-4o".to_string());
        assert_eq!(settings.model.model_name(), "gpt-4o");
    }

    #[test]
    fn environment_parsing() {
        assert!(matches!(
            Environment::try_from("Production".to_string()),
            Ok(Environment::Production)
        ));
        assert!(Environment::try_from("staging".to_string()).is_err());
    }
}
