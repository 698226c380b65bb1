pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, FetchError};
use types::{
    folder_filter, Document, DocumentList, RetrievalRequest, RetrievalResponse, RetrievalResult,
};

/// Anything that can answer a scored passage query against one collection.
///
/// Implementations never fail outward: a failed lookup is an empty result.
#[async_trait]
pub trait PassageSource: Send + Sync {
    async fn query_passages(
        &self,
        collection: &str,
        query: &str,
        top_k: u32,
        rerank: bool,
    ) -> RetrievalResult;
}

/// Client for the Ragie document-retrieval API.
pub struct RetrievalClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RetrievalClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("RAGIE_API_KEY"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("accept", "application/json")
            .header("authorization", format!("Bearer {}", self.api_key))
    }

    /// Most recent documents in `collection`, at most `limit`.
    /// Failures are logged and produce an empty list.
    pub async fn list_recent_documents(&self, collection: &str, limit: u32) -> Vec<Document> {
        match self.try_list(collection, limit).await {
            Ok(docs) => {
                debug!(collection, count = docs.len(), "documents listed");
                docs
            }
            Err(e) => {
                warn!(collection, error = %e, "Failed to list documents");
                Vec::new()
            }
        }
    }

    async fn try_list(&self, collection: &str, limit: u32) -> Result<Vec<Document>, FetchError> {
        let filter = folder_filter(collection).to_string();
        let req = self
            .client
            .get(self.url("/documents"))
            .query(&[("page_size", limit.to_string()), ("filter", filter)]);

        let text = self
            .authorized(req)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let list: DocumentList = serde_json::from_str(&text)
            .map_err(|e| FetchError::Malformed(format!("document list: {}", e)))?;

        Ok(list.documents.into_iter().map(Document::from).collect())
    }

    /// Precomputed summary for one document, or `None` when absent or unreachable.
    pub async fn fetch_summary(&self, document_id: &str) -> Option<String> {
        match self.try_summary(document_id).await {
            Ok(Some(summary)) => Some(summary),
            Ok(None) => {
                warn!(document_id, "No summary found for document");
                None
            }
            Err(e) => {
                warn!(document_id, error = %e, "Failed to fetch document summary");
                None
            }
        }
    }

    async fn try_summary(&self, document_id: &str) -> Result<Option<String>, FetchError> {
        let req = self
            .client
            .get(self.url(&format!("/documents/{}/summary", document_id)));
        let body = self
            .authorized(req)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_summary_body(&body))
    }

    /// List recent meetings and fill in every summary, fetched concurrently.
    pub async fn recent_meetings(&self, collection: &str, limit: u32) -> Vec<Document> {
        let mut docs = self.list_recent_documents(collection, limit).await;
        let summaries = join_all(docs.iter().map(|d| self.fetch_summary(&d.id))).await;
        for (doc, summary) in docs.iter_mut().zip(summaries) {
            doc.summary = summary;
        }
        info!(
            collection,
            count = docs.len(),
            with_summary = docs.iter().filter(|d| d.summary.is_some()).count(),
            "Recent meetings fetched"
        );
        docs
    }

    /// Scored passage retrieval scoped to `collection`.
    /// Failures are logged and produce an empty result.
    pub async fn query_passages(
        &self,
        collection: &str,
        query: &str,
        top_k: u32,
        rerank: bool,
    ) -> RetrievalResult {
        match self.try_query(collection, query, top_k, rerank).await {
            Ok(result) => {
                debug!(collection, hits = result.len(), "passages retrieved");
                result
            }
            Err(e) => {
                warn!(collection, error = %e, "Passage retrieval failed");
                RetrievalResult::empty(collection)
            }
        }
    }

    async fn try_query(
        &self,
        collection: &str,
        query: &str,
        top_k: u32,
        rerank: bool,
    ) -> Result<RetrievalResult, FetchError> {
        let body = RetrievalRequest {
            rerank,
            query,
            top_k,
            filter: folder_filter(collection),
        };
        let req = self.client.post(self.url("/retrievals")).json(&body);
        let text = self
            .authorized(req)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let parsed: RetrievalResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Malformed(format!("retrieval response: {}", e)))?;

        Ok(RetrievalResult::from_scored(
            collection,
            parsed.scored_chunks.into_iter().map(|c| (c.text, c.score)),
        ))
    }
}

#[async_trait]
impl PassageSource for RetrievalClient {
    async fn query_passages(
        &self,
        collection: &str,
        query: &str,
        top_k: u32,
        rerank: bool,
    ) -> RetrievalResult {
        RetrievalClient::query_passages(self, collection, query, top_k, rerank).await
    }
}

/// Accepts `{"summary": "..."}`, a bare JSON string, or a plain-text body.
fn parse_summary_body(body: &str) -> Option<String> {
    let summary = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map
            .get("summary")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    };
    summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
