use crate::types::{AppError, Result};
use crate::utils::toml_config::AzureDeploymentConfig;
use async_openai::{config::AzureConfig, types::embeddings::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;

/// Text embedding service.
///
/// The pipeline embeds chunk texts at ingest time and the question at
/// query time through this trait.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the deployment/model identifier used for embedding.
    fn model_name(&self) -> &str;
}

/// Embedder backed by an Azure OpenAI embedding deployment.
pub struct AzureEmbedder {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureEmbedder {
    /// Build an embedder from the `[embedding]` section of the configuration.
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
impl Embedder for AzureEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.deployment)
            .input(texts.to_vec())
            .build()
            .map_err(|e| AppError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| AppError::Embedding(format!("Azure OpenAI API error: {}", e)))?;

        if response.data.len() != texts.len() {
            return Err(AppError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        // The API may return entries out of order; restore input order
        let mut data = response.data;
        data.sort_by_key(|e| e.index);

        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.deployment
    }
}
