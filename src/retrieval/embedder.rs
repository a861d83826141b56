use anyhow::{ensure, Context, Result};
use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;

use super::Embedder;
use crate::config::LlmConfig;

/// `/embeddings` on the same OpenAI compatible server that answers chats.
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(llm: &LlmConfig, model: &str) -> OpenAiEmbedder {
        let openai = OpenAIConfig::new()
            .with_api_base(&llm.api_base)
            .with_api_key(&llm.api_key);
        OpenAiEmbedder {
            client: Client::with_config(openai),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(texts.to_vec())
            .build()?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .with_context(|| format!("Embedding with {} failed", self.model))?;

        let mut data = response.data;
        ensure!(
            data.len() == texts.len(),
            "Expected {} embeddings, got {}",
            texts.len(),
            data.len()
        );
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}
