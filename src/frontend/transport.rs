use anyhow::{Context, Result};
use async_trait::async_trait;

/// Carries one user message to the chat server and returns the reply text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

/// Posts `msg=<text>` as a url-encoded form and uses the body verbatim.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>) -> HttpBackend {
        HttpBackend {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("msg", message)])
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?
            .error_for_status()?;

        let reply = response.text().await.context("Failed to read reply body")?;
        Ok(reply)
    }
}
