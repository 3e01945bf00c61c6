use crate::llm::client::{ChatClient, ChatMessage, ChatRole};
use crate::types::{AppError, Result};
use crate::utils::toml_config::AzureDeploymentConfig;
use async_openai::{
    config::AzureConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Chat client for an Azure OpenAI chat deployment.
pub struct AzureChatClient {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureChatClient {
    /// Build a client from the `[chat]` section of the configuration.
    pub fn from_config(config: &AzureDeploymentConfig) -> Result<Self> {
        let api_key = config
            .resolve_api_key()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        let azure_config = AzureConfig::new()
            .with_api_base(&config.azure_endpoint)
            .with_api_version(&config.api_version)
            .with_deployment_id(&config.azure_deployment)
            .with_api_key(api_key);

        Ok(Self {
            client: Client::with_config(azure_config),
            deployment: config.azure_deployment.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for AzureChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let chat_messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(|m| match m.role {
                ChatRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(m.content.clone()),
                ),
                ChatRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(m.content.clone()),
                ),
            })
            .collect();

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.deployment)
            .messages(chat_messages)
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Llm(format!("Azure OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::Llm("No response from Azure OpenAI".to_string()))
    }

    fn deployment_name(&self) -> &str {
        &self.deployment
    }
}
