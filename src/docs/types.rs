use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A meeting record from the retrieval store.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Filled lazily by a follow-up summary fetch.
    pub summary: Option<String>,
}

/// A scored text fragment returned by a retrieval query.
#[derive(Debug, Clone, PartialEq)]
pub struct PassageChunk {
    pub text: String,
    pub score: f64,
    /// Collection the chunk was retrieved from.
    pub collection: String,
}

/// Ordered chunks from a single collection query. Empty means "no matches".
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalResult {
    collection: String,
    chunks: Vec<PassageChunk>,
}

impl RetrievalResult {
    pub fn empty(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            chunks: Vec::new(),
        }
    }

    /// Build a result for `collection` from `(text, score)` pairs in response order.
    /// Chunks are stamped with the collection and stable-sorted by descending score.
    pub fn from_scored<I>(collection: &str, scored: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut chunks: Vec<PassageChunk> = scored
            .into_iter()
            .map(|(text, score)| PassageChunk {
                text,
                score,
                collection: collection.to_string(),
            })
            .collect();
        chunks.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            collection: collection.to_string(),
            chunks,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn chunks(&self) -> &[PassageChunk] {
        &self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk texts joined by newlines, in result order.
    pub fn joined_text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// Wire shapes for the retrieval API.

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentList {
    pub documents: Vec<DocumentEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<DocumentEntry> for Document {
    fn from(entry: DocumentEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.unwrap_or_else(|| "Untitled".to_string()),
            created_at: entry.created_at.as_deref().and_then(parse_timestamp),
            updated_at: entry.updated_at.as_deref().and_then(parse_timestamp),
            summary: None,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Serialize)]
pub(crate) struct RetrievalRequest<'a> {
    pub rerank: bool,
    pub query: &'a str,
    pub top_k: u32,
    pub filter: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RetrievalResponse {
    #[serde(default)]
    pub scored_chunks: Vec<ScoredChunk>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoredChunk {
    pub text: String,
    #[serde(default)]
    pub score: f64,
}

/// `{"folder": {"$eq": collection}}`
pub(crate) fn folder_filter(collection: &str) -> serde_json::Value {
    serde_json::json!({ "folder": { "$eq": collection } })
}
