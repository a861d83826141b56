use anyhow::{anyhow, Context, Result};
use async_openai::{config::OpenAIConfig, types as openai_types, Client};
use async_trait::async_trait;
use indoc::formatdoc;

use super::Assistant;
use crate::config::LlmConfig;
use crate::retrieval::{format_context, Retriever};

type ModelArgs = openai_types::CreateChatCompletionRequestArgs;
type Message = openai_types::ChatCompletionRequestMessage;
type MessageArgs = openai_types::ChatCompletionRequestMessageArgs;

fn system_init(context: &str, question: &str) -> String {
    formatdoc!(
        "
        You are a knowledgeable and professional medical assistant. Your role is to provide accurate, helpful, and concise medical information based on the provided context.

        Guidelines:
        1. Use the provided medical context to answer questions accurately
        2. If the answer is not in the context, clearly state \"I don't have enough information to answer that question based on the provided documentation\"
        3. Keep responses concise (2-3 sentences) but informative
        4. Use medical terminology appropriately
        5. Always maintain a professional and empathetic tone
        6. If the question is about symptoms or treatment, include a disclaimer about consulting healthcare professionals
        7. Do not make definitive diagnoses or treatment recommendations
        8. Do not mention the context or your limitations in your response

        Context:
        {context}

        Question: {question}

        Answer:",
        context = context,
        question = question,
    )
}

const MAX_TOKENS: u16 = 512;

/// Retrieval-augmented chat completions against any OpenAI compatible
/// server, Ollama included.
pub struct Bot {
    client: Client<OpenAIConfig>,
    retriever: Retriever,
    model: String,
    temperature: f32,
}

impl Bot {
    pub fn new(config: &LlmConfig, retriever: Retriever) -> Bot {
        let openai = OpenAIConfig::new()
            .with_api_base(&config.api_base)
            .with_api_key(&config.api_key);
        Bot {
            client: Client::with_config(openai),
            retriever,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    fn messages(context: &str, question: &str) -> Result<Vec<Message>> {
        Ok(vec![
            MessageArgs::default()
                .role(openai_types::Role::System)
                .content(system_init(context, question))
                .build()?,
            MessageArgs::default()
                .role(openai_types::Role::User)
                .content(question)
                .build()?,
        ])
    }
}

#[async_trait]
impl Assistant for Bot {
    async fn answer(&self, question: &str) -> Result<String> {
        let chunks = self
            .retriever
            .retrieve(question)
            .await
            .context("Failed to retrieve context")?;
        let context = format_context(&chunks);

        let request = ModelArgs::default()
            .model(&self.model)
            .max_tokens(MAX_TOKENS)
            .temperature(self.temperature)
            .messages(Bot::messages(&context, question)?)
            .build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .with_context(|| format!("Chat completion with {} failed", self.model))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Model returned no content"))
    }
}
