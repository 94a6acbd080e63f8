use std::time::Duration;

use anyhow::anyhow;
use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat},
    Client,
};
use async_trait::async_trait;

use crate::configuration::ModelSettings;

/// Sends an extraction prompt to a generative model and returns its raw text.
#[async_trait]
pub trait ExtractionModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenaiClient {
    pub fn new(settings: &ModelSettings) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(settings.api_key.clone())
            .with_api_base(settings.api_base.clone());

        OpenaiClient {
            client: Client::with_config(config),
            model: settings.model_name(),
            temperature: settings.temperature,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

#[async_trait]
impl ExtractionModel for OpenaiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .temperature(self.temperature)
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| anyhow!("Model call timed out after {}s", self.timeout.as_secs()))??;
        log::debug!("Model response: {:?}", response);

        let content = response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No choices in model response"))?
            .message
            .content
            .clone()
            .ok_or_else(|| anyhow!("No content in model response"))?;

        Ok(content.trim().to_string())
    }
}
