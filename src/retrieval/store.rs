use anyhow::{ensure, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Chunk, SearchHit, VectorStore};

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Brute-force cosine search over everything ingested this run.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<(Chunk, Vec<f32>)>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn upsert(&self, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<()> {
        ensure!(
            chunks.len() == embeddings.len(),
            "{} chunks but {} embeddings",
            chunks.len(),
            embeddings.len()
        );
        self.entries
            .write()
            .await
            .extend(chunks.into_iter().zip(embeddings));
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let entries = self.entries.read().await;
        let mut hits: Vec<SearchHit> = entries
            .iter()
            .map(|(chunk, embedding)| SearchHit {
                chunk: chunk.clone(),
                score: cosine_similarity(query, embedding),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }
}
