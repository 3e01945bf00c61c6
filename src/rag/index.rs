//! Document index: the ingestion/retrieval/answering orchestrator.
//!
//! The [`DocumentIndex`] owns the vector store, the embedder, and the
//! chat client, plus a registry mapping each document name to the chunk
//! IDs stored for it. All HTTP handlers delegate here.

use crate::db::vectorstore::VectorStore;
use crate::llm::client::{ChatClient, ChatMessage};
use crate::rag::chunker::TextChunker;
use crate::rag::pdf;
use crate::types::{
    AnswerLanguage, AppError, AskResponse, Chunk, ChunkKind, ChunkMetadata, DocumentRow,
    IngestResult, Result, ScoredChunk, Source, StoreInfo,
};
use crate::utils::toml_config::RagConfig;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Answer returned when retrieval finds nothing to ground on.
pub const NO_CONTEXT_ANSWER: &str = "No relevant context found in your documents.";

/// How many leading chunks feed the metadata synthesis prompt.
const META_EXTRACT_CHUNKS: usize = 10;

/// Registry entry for one ingested document.
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    pub chunk_ids: Vec<String>,
    pub inserted_at: DateTime<Utc>,
}

/// Build the metadata-synthesis message list for a document extract.
pub fn librarian_messages(extract: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a librarian extracting metadata from documents."),
        ChatMessage::user(format!(
            "Extract from the content the following metadata.\n\
             Answer 'unknown' if you cannot find or generate the information.\n\
             Metadata list:\n\
             - title\n\
             - author\n\
             - source\n\
             - type of content (e.g. scientific paper, literature, news, etc.)\n\
             - language\n\
             - themes as a list of keywords\n\
             \n\
             <content>\n\
             {}\n\
             </content>",
            extract
        )),
    ]
}

/// Build the grounded question-answering message list.
pub fn qa_messages(question: &str, context: &str, language: AnswerLanguage) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are an assistant for question-answering tasks."),
        ChatMessage::system(format!(
            "Use the following pieces of retrieved context to answer the question.\n\
             If you don't know the answer, just say that you don't know.\n\
             Use three sentences maximum and keep the answer concise.\n\
             {}\n\
             {}",
            language.instruction(),
            context
        )),
        ChatMessage::user(question),
    ]
}

/// The ingestion/retrieval/answering pipeline.
pub struct DocumentIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn crate::rag::embeddings::Embedder>,
    chat: Arc<dyn ChatClient>,
    documents: RwLock<HashMap<String, DocumentEntry>>,
}

impl DocumentIndex {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn crate::rag::embeddings::Embedder>,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            store,
            embedder,
            chat,
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Ingest a PDF: extract, chunk, synthesize metadata, embed, index.
    ///
    /// Re-ingesting an existing document name replaces its previous
    /// chunks.
    pub async fn ingest_pdf(
        &self,
        document_name: &str,
        bytes: &[u8],
        rag: &RagConfig,
    ) -> Result<IngestResult> {
        let text = pdf::extract_text(bytes)?;
        self.ingest_text(document_name, &text, rag).await
    }

    /// Ingest already-extracted text under a document name.
    pub async fn ingest_text(
        &self,
        document_name: &str,
        text: &str,
        rag: &RagConfig,
    ) -> Result<IngestResult> {
        if document_name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Document name must not be empty".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(format!(
                "No text could be extracted from '{}'",
                document_name
            )));
        }

        let start = Instant::now();

        let chunker = TextChunker::new(rag.chunk_size, rag.chunk_overlap);
        let texts = chunker.chunk(text)?;
        if texts.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Document '{}' produced no chunks",
                document_name
            )));
        }

        let insert_date = Utc::now();
        let base_id = Uuid::new_v4().to_string();

        let mut chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, content)| Chunk {
                id: format!("{}_{}", base_id, i),
                content: content.clone(),
                metadata: ChunkMetadata {
                    document_name: document_name.to_string(),
                    insert_date,
                    kind: ChunkKind::Body,
                },
                embedding: None,
            })
            .collect();

        // Synthesize a librarian-style metadata chunk from the leading
        // chunks and index it with the body
        let metadata_synthesized = if rag.synthesize_metadata {
            let extract_len = META_EXTRACT_CHUNKS.min(texts.len());
            let extract = texts[..extract_len].join("\n\n");
            let summary = self.chat.complete(&librarian_messages(&extract)).await?;
            chunks.push(Chunk {
                id: format!("{}_meta", base_id),
                content: summary,
                metadata: ChunkMetadata {
                    document_name: document_name.to_string(),
                    insert_date,
                    kind: ChunkKind::Metadata,
                },
                embedding: None,
            });
            true
        } else {
            false
        };

        // Embed all chunk texts in one batch
        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed(&contents).await?;
        if embeddings.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = Some(embedding);
        }

        // Re-upload replaces the previous version of the document
        let previous_ids: Vec<String> = {
            let documents = self.documents.read();
            documents
                .get(document_name)
                .map(|entry| entry.chunk_ids.clone())
                .unwrap_or_default()
        };
        if !previous_ids.is_empty() {
            self.store.delete(&previous_ids).await?;
        }

        let chunk_ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();
        let chunks_indexed = self.store.upsert(&chunks).await?;

        {
            let mut documents = self.documents.write();
            documents.insert(
                document_name.to_string(),
                DocumentEntry {
                    chunk_ids,
                    inserted_at: insert_date,
                },
            );
        }

        info!(
            document = %document_name,
            chunks = chunks_indexed,
            metadata = metadata_synthesized,
            replaced = !previous_ids.is_empty(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Document ingested"
        );

        Ok(IngestResult {
            document_name: document_name.to_string(),
            chunks_indexed,
            metadata_synthesized,
        })
    }

    /// Delete all chunks tracked for a document name.
    ///
    /// Unknown names remove nothing and return 0.
    pub async fn delete_document(&self, document_name: &str) -> Result<usize> {
        let entry = {
            let mut documents = self.documents.write();
            documents.remove(document_name)
        };

        let Some(entry) = entry else {
            return Ok(0);
        };

        let removed = self.store.delete(&entry.chunk_ids).await?;

        info!(document = %document_name, chunks = removed, "Document deleted");

        Ok(removed)
    }

    /// Embed the question and return the top-k most similar chunks.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        let embeddings = self.embedder.embed(&[question.to_string()]).await?;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Embedding("No embedding returned for query".to_string()))?;

        // No similarity floor; the best k chunks are returned even when
        // every score is negative
        self.store.search(&query_embedding, top_k, f32::MIN).await
    }

    /// Answer a question grounded in the indexed documents.
    pub async fn answer(
        &self,
        question: &str,
        language: AnswerLanguage,
        requested_top_k: Option<usize>,
        rag: &RagConfig,
    ) -> Result<AskResponse> {
        if question.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Question must not be empty".to_string(),
            ));
        }

        let top_k = clamp_top_k(requested_top_k, rag);
        let start = Instant::now();

        let hits = self.retrieve(question, top_k).await?;
        if hits.is_empty() {
            return Ok(AskResponse {
                answer: NO_CONTEXT_ANSWER.to_string(),
                sources: Vec::new(),
                language,
                top_k,
            });
        }

        let context = hits
            .iter()
            .map(|h| h.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let answer = self
            .chat
            .complete(&qa_messages(question, &context, language))
            .await?;

        let sources = hits
            .iter()
            .map(|h| Source {
                document_name: h.chunk.metadata.document_name.clone(),
                score: h.score,
            })
            .collect();

        info!(
            top_k,
            retrieved = hits.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Question answered"
        );

        Ok(AskResponse {
            answer,
            sources,
            language,
            top_k,
        })
    }

    /// List ingested documents, most recent first.
    pub fn list_documents(&self, limit: usize) -> Vec<DocumentRow> {
        let documents = self.documents.read();
        let mut rows: Vec<DocumentRow> = documents
            .iter()
            .map(|(name, entry)| DocumentRow {
                document_name: name.clone(),
                chunks: entry.chunk_ids.len(),
                insert_date: entry.inserted_at,
            })
            .collect();

        rows.sort_by(|a, b| b.insert_date.cmp(&a.insert_date));
        rows.truncate(limit);
        rows
    }

    /// High-level info about the index.
    pub fn store_info(&self) -> StoreInfo {
        let documents = self.documents.read();
        let chunks = documents.values().map(|e| e.chunk_ids.len()).sum();

        StoreInfo {
            backend: self.store.backend_name().to_string(),
            documents: documents.len(),
            chunks,
        }
    }
}

/// Clamp a requested top-k to `1..=max_top_k`, defaulting when absent.
pub fn clamp_top_k(requested: Option<usize>, rag: &RagConfig) -> usize {
    requested
        .unwrap_or(rag.default_top_k)
        .clamp(1, rag.max_top_k)
}
