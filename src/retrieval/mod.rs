//! Context retrieval over the medical PDF library.
//!
//! Documents are loaded once at startup, split paragraph-first, embedded in
//! batches and kept in a vector store. Each question is embedded and the
//! closest chunks are handed to the model as context.

mod embedder;
mod loader;
mod splitter;
mod store;

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;

pub use embedder::OpenAiEmbedder;
pub use loader::{load_pdfs, Page};
pub use splitter::{split_pages, CHUNK_OVERLAP, CHUNK_SIZE};
pub use store::{cosine_similarity, MemoryStore};

/// Chunks embedded per request while ingesting.
pub const BATCH_SIZE: usize = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub text: String,
    /// File the chunk came from.
    pub source: String,
    /// 1-based page number.
    pub page: usize,
}

#[derive(Clone, Debug)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f32,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<()>;
    /// Best matches first.
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>>;
}

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>, top_k: usize) -> Retriever {
        Retriever {
            embedder,
            store,
            top_k,
        }
    }

    /// Embeds and stores `chunks` in batches of `BATCH_SIZE`.
    pub async fn ingest(&self, chunks: Vec<Chunk>) -> Result<usize> {
        let total = chunks.len();
        let batches = (total + BATCH_SIZE - 1) / BATCH_SIZE;

        for (i, batch) in chunks.chunks(BATCH_SIZE).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self
                .embedder
                .embed(&texts)
                .await
                .with_context(|| format!("Failed to embed batch {}/{batches}", i + 1))?;
            ensure!(
                embeddings.len() == batch.len(),
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                batch.len()
            );
            self.store.upsert(batch.to_vec(), embeddings).await?;
            tracing::info!("Uploaded batch {}/{batches} ({} chunks)", i + 1, batch.len());
        }

        Ok(total)
    }

    pub async fn retrieve(&self, question: &str) -> Result<Vec<Chunk>> {
        let query = self
            .embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .context("Embedder returned no vector for the question")?;

        let hits = self.store.search(&query, self.top_k).await?;
        for (i, hit) in hits.iter().enumerate() {
            let preview: String = hit.chunk.text.chars().take(300).collect();
            tracing::debug!(
                score = hit.score,
                source = %hit.chunk.source,
                page = hit.chunk.page,
                "chunk {}: {preview}",
                i + 1
            );
        }

        Ok(hits.into_iter().map(|hit| hit.chunk).collect())
    }
}

pub fn format_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
