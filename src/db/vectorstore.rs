//! Vector Store Abstraction Layer
//!
//! This module provides the vector index behind document retrieval. The
//! [`VectorStore`] trait is the seam where an external vector database
//! would plug in; the shipped implementation is an in-memory cosine
//! store with an optional JSON snapshot on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptorium::db::vectorstore::{InMemoryVectorStore, VectorStore};
//!
//! let store = InMemoryVectorStore::new();
//! store.upsert(&chunks).await?;
//! let hits = store.search(&query_embedding, 5, 0.0).await?;
//! ```

use crate::types::{AppError, Chunk, Result, ScoredChunk};
use async_trait::async_trait;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Abstract trait for vector index operations.
///
/// The application stores document chunks with embeddings and retrieves
/// them by cosine similarity. Implementations must be safe to share
/// across handler tasks.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Get the name of this vector store backend.
    fn backend_name(&self) -> &'static str;

    /// Upsert chunks into the index.
    ///
    /// Chunks are identified by their `id` field. If a chunk with the
    /// same ID already exists, it is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if any chunk is missing an embedding.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Search for the chunks most similar to the query embedding.
    ///
    /// # Returns
    ///
    /// Up to `limit` results with score >= `threshold`, sorted by
    /// similarity score (descending). Returned chunks have their
    /// embeddings stripped.
    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredChunk>>;

    /// Delete chunks by their IDs.
    ///
    /// # Returns
    ///
    /// Number of chunks actually deleted.
    async fn delete(&self, ids: &[String]) -> Result<usize>;

    /// Get a chunk by ID.
    async fn get(&self, id: &str) -> Result<Option<Chunk>>;

    /// Count chunks in the index.
    async fn count(&self) -> Result<usize>;
}

// ============================================================================
// In-Memory Vector Store
// ============================================================================

/// In-memory vector store using cosine similarity.
///
/// Contents are lost when the process exits unless a snapshot path is
/// configured, in which case the index is serialized to JSON after each
/// mutation and restored at startup.
pub struct InMemoryVectorStore {
    chunks: Arc<RwLock<HashMap<String, Chunk>>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(RwLock::new(HashMap::new())),
            snapshot_path: None,
        }
    }

    /// Create a store backed by a JSON snapshot file.
    ///
    /// If the file exists, the index is restored from it; otherwise it
    /// starts empty and the file is created on the first write.
    pub fn with_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let chunks = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| AppError::Internal(format!("Failed to read snapshot: {}", e)))?;
            let restored: Vec<Chunk> = serde_json::from_str(&content)
                .map_err(|e| AppError::Internal(format!("Failed to parse snapshot: {}", e)))?;
            restored.into_iter().map(|c| (c.id.clone(), c)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            chunks: Arc::new(RwLock::new(chunks)),
            snapshot_path: Some(path),
        })
    }

    /// Calculate cosine similarity between two vectors.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Write the current index to the snapshot file, if configured.
    fn save_snapshot(&self) -> Result<()> {
        let Some(ref path) = self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Internal(format!("Failed to create snapshot dir: {}", e)))?;
        }

        let content = {
            let chunks = self.chunks.read();
            let all: Vec<&Chunk> = chunks.values().collect();
            serde_json::to_string(&all)
                .map_err(|e| AppError::Internal(format!("Failed to serialize snapshot: {}", e)))?
        };

        std::fs::write(path, content)
            .map_err(|e| AppError::Internal(format!("Failed to write snapshot: {}", e)))?;

        Ok(())
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn upsert(&self, new_chunks: &[Chunk]) -> Result<usize> {
        {
            let mut chunks = self.chunks.write();
            for chunk in new_chunks {
                if chunk.embedding.is_none() {
                    return Err(AppError::InvalidInput(format!(
                        "Chunk '{}' is missing embedding",
                        chunk.id
                    )));
                }
                chunks.insert(chunk.id.clone(), chunk.clone());
            }
        }

        self.save_snapshot()?;
        Ok(new_chunks.len())
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredChunk>> {
        let chunks = self.chunks.read();

        let mut results: Vec<ScoredChunk> = chunks
            .values()
            .filter_map(|chunk| {
                let chunk_embedding = chunk.embedding.as_ref()?;
                let score = Self::cosine_similarity(embedding, chunk_embedding);
                if score >= threshold {
                    Some(ScoredChunk {
                        chunk: Chunk {
                            id: chunk.id.clone(),
                            content: chunk.content.clone(),
                            metadata: chunk.metadata.clone(),
                            embedding: None, // Don't return embeddings in results
                        },
                        score,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        // Limit results
        results.truncate(limit);

        Ok(results)
    }

    async fn delete(&self, ids: &[String]) -> Result<usize> {
        let count = {
            let mut chunks = self.chunks.write();
            let mut count = 0;
            for id in ids {
                if chunks.remove(id).is_some() {
                    count += 1;
                }
            }
            count
        };

        self.save_snapshot()?;
        Ok(count)
    }

    async fn get(&self, id: &str) -> Result<Option<Chunk>> {
        let chunks = self.chunks.read();
        Ok(chunks.get(id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        let chunks = self.chunks.read();
        Ok(chunks.len())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkKind, ChunkMetadata};
    use chrono::Utc;

    fn create_test_chunk(id: &str, content: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: id.to_string(),
            content: content.to_string(),
            metadata: ChunkMetadata {
                document_name: "test.pdf".to_string(),
                insert_date: Utc::now(),
                kind: ChunkKind::Body,
            },
            embedding: Some(embedding),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = InMemoryVectorStore::new();

        let c1 = create_test_chunk("c1", "Hello world", vec![1.0, 0.0, 0.0]);
        let c2 = create_test_chunk("c2", "Goodbye world", vec![0.0, 1.0, 0.0]);
        let c3 = create_test_chunk("c3", "Hello again", vec![0.9, 0.1, 0.0]);

        store.upsert(&[c1, c2, c3]).await.unwrap();

        // Search for chunks similar to [1.0, 0.0, 0.0]
        let results = store.search(&[1.0, 0.0, 0.0], 10, 0.5).await.unwrap();

        assert_eq!(results.len(), 2); // c1 and c3 should match
        assert_eq!(results[0].chunk.id, "c1"); // Exact match first
        assert_eq!(results[1].chunk.id, "c3"); // Similar second
    }

    #[tokio::test]
    async fn test_search_min_threshold_keeps_negative_scores() {
        let store = InMemoryVectorStore::new();
        let chunk = create_test_chunk("c1", "Opposed", vec![-1.0, 0.0, 0.0]);
        store.upsert(&[chunk]).await.unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 5, f32::MIN).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].score < 0.0);
    }

    #[tokio::test]
    async fn test_upsert_rejects_missing_embedding() {
        let store = InMemoryVectorStore::new();

        let mut chunk = create_test_chunk("c1", "No embedding", vec![]);
        chunk.embedding = None;

        let result = store.upsert(&[chunk]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_search_strips_embeddings() {
        let store = InMemoryVectorStore::new();
        let chunk = create_test_chunk("c1", "Test", vec![1.0, 0.0, 0.0]);
        store.upsert(&[chunk]).await.unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 1, 0.0).await.unwrap();
        assert!(results[0].chunk.embedding.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryVectorStore::new();

        let chunk = create_test_chunk("c1", "Test", vec![1.0, 0.0, 0.0]);
        store.upsert(&[chunk]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);

        let deleted = store.delete(&["c1".to_string()]).await.unwrap();
        assert_eq!(deleted, 1);

        assert_eq!(store.count().await.unwrap(), 0);

        // Deleting an unknown ID removes nothing
        let deleted = store.delete(&["c1".to_string()]).await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_get() {
        let store = InMemoryVectorStore::new();

        let chunk = create_test_chunk("c1", "Test content", vec![1.0, 0.0, 0.0]);
        store.upsert(&[chunk]).await.unwrap();

        let retrieved = store.get("c1").await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().content, "Test content");

        let not_found = store.get("nonexistent").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        {
            let store = InMemoryVectorStore::with_snapshot(&path).unwrap();
            let chunk = create_test_chunk("c1", "Persisted", vec![1.0, 0.0, 0.0]);
            store.upsert(&[chunk]).await.unwrap();
        }

        let restored = InMemoryVectorStore::with_snapshot(&path).unwrap();
        assert_eq!(restored.count().await.unwrap(), 1);
        let chunk = restored.get("c1").await.unwrap().unwrap();
        assert_eq!(chunk.content, "Persisted");
    }

    #[tokio::test]
    async fn test_cosine_similarity() {
        // Identical vectors
        assert!((InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 0.001);

        // Orthogonal vectors
        assert!(InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.001);

        // Opposite vectors
        assert!((InMemoryVectorStore::cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 0.001);
    }
}
