use std::sync::Arc;

use tracing::debug;

use super::intent::Category;
use crate::docs::types::RetrievalResult;
use crate::docs::PassageSource;

/// Per-collection results of one retrieval step.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResults {
    pub meeting_notes: RetrievalResult,
    pub client_agreements: RetrievalResult,
}

impl CollectionResults {
    pub fn is_empty(&self) -> bool {
        self.meeting_notes.is_empty() && self.client_agreements.is_empty()
    }
}

/// Queries the collection(s) a category points at.
pub struct CollectionRetriever {
    source: Arc<dyn PassageSource>,
    meeting_collection: String,
    agreement_collection: String,
    top_k: u32,
    rerank: bool,
}

impl CollectionRetriever {
    pub fn new(
        source: Arc<dyn PassageSource>,
        meeting_collection: &str,
        agreement_collection: &str,
        top_k: u32,
        rerank: bool,
    ) -> Self {
        Self {
            source,
            meeting_collection: meeting_collection.to_string(),
            agreement_collection: agreement_collection.to_string(),
            top_k,
            rerank,
        }
    }

    async fn query(&self, collection: &str, query: &str) -> RetrievalResult {
        self.source
            .query_passages(collection, query, self.top_k, self.rerank)
            .await
    }

    pub async fn retrieve(&self, category: Category, query: &str) -> CollectionResults {
        let results = match category {
            Category::MeetingNotes => CollectionResults {
                meeting_notes: self.query(&self.meeting_collection, query).await,
                client_agreements: RetrievalResult::empty(&self.agreement_collection),
            },
            Category::ClientAgreements => CollectionResults {
                meeting_notes: RetrievalResult::empty(&self.meeting_collection),
                client_agreements: self.query(&self.agreement_collection, query).await,
            },
            // Ambiguous routing retrieves broadly; both lookups run to completion.
            Category::Both | Category::Unrecognized => {
                let (meeting_notes, client_agreements) = tokio::join!(
                    self.query(&self.meeting_collection, query),
                    self.query(&self.agreement_collection, query),
                );
                CollectionResults {
                    meeting_notes,
                    client_agreements,
                }
            }
        };

        debug!(
            %category,
            meeting_hits = results.meeting_notes.len(),
            agreement_hits = results.client_agreements.len(),
            "collections retrieved"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::testing::RecordingSource;

    const MEETINGS: &str = "test_meetings";
    const AGREEMENTS: &str = "test_client_agreements";

    fn retriever(source: Arc<RecordingSource>) -> CollectionRetriever {
        CollectionRetriever::new(source, MEETINGS, AGREEMENTS, 8, true)
    }

    #[tokio::test]
    async fn test_meeting_notes_queries_one_collection() {
        let source = Arc::new(
            RecordingSource::new()
                .with_chunks(MEETINGS, &["standup notes"])
                .with_chunks(AGREEMENTS, &["msa clause"]),
        );
        let results = retriever(source.clone())
            .retrieve(Category::MeetingNotes, "q")
            .await;

        assert_eq!(source.calls(), vec![MEETINGS.to_string()]);
        assert_eq!(results.meeting_notes.len(), 1);
        assert!(results.client_agreements.is_empty());
        assert_eq!(results.client_agreements.collection(), AGREEMENTS);
    }

    #[tokio::test]
    async fn test_client_agreements_queries_one_collection() {
        let source = Arc::new(RecordingSource::new().with_chunks(AGREEMENTS, &["msa clause"]));
        let results = retriever(source.clone())
            .retrieve(Category::ClientAgreements, "q")
            .await;

        assert_eq!(source.calls(), vec![AGREEMENTS.to_string()]);
        assert!(results.meeting_notes.is_empty());
        assert_eq!(results.client_agreements.len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_queries_both_collections() {
        for query in ["", "pricing", "what happened last week?"] {
            let source = Arc::new(RecordingSource::new());
            retriever(source.clone())
                .retrieve(Category::Unrecognized, query)
                .await;

            let mut calls = source.calls();
            calls.sort();
            assert_eq!(calls, vec![AGREEMENTS.to_string(), MEETINGS.to_string()]);
        }
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_other() {
        let source = Arc::new(
            RecordingSource::new()
                .with_chunks(AGREEMENTS, &["Client agreed to $500/mo"])
                .failing(MEETINGS),
        );
        let results = retriever(source.clone())
            .retrieve(Category::Both, "pricing")
            .await;

        assert_eq!(source.calls().len(), 2);
        assert!(results.meeting_notes.is_empty());
        assert_eq!(
            results.client_agreements.chunks()[0].text,
            "Client agreed to $500/mo"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_over_http_is_isolated() {
        use crate::docs::RetrievalClient;
        use mockito::{Matcher, Server};
        use std::time::Duration;

        let mut server = Server::new_async().await;
        let meetings = server
            .mock("POST", "/retrievals")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "filter": {"folder": {"$eq": MEETINGS}}
            })))
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let agreements = server
            .mock("POST", "/retrievals")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "filter": {"folder": {"$eq": AGREEMENTS}}
            })))
            .with_status(200)
            .with_body(r#"{"scored_chunks": [{"text": "Renewal is annual", "score": 0.8}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client =
            RetrievalClient::new("test-key", &server.url(), Duration::from_secs(5)).unwrap();
        let results = CollectionRetriever::new(Arc::new(client), MEETINGS, AGREEMENTS, 8, true)
            .retrieve(Category::Both, "renewal terms")
            .await;

        assert!(results.meeting_notes.is_empty());
        assert_eq!(results.client_agreements.len(), 1);
        meetings.assert_async().await;
        agreements.assert_async().await;
    }

    #[tokio::test]
    async fn test_top_k_and_rerank_forwarded() {
        let source = Arc::new(RecordingSource::new());
        CollectionRetriever::new(source.clone(), MEETINGS, AGREEMENTS, 3, false)
            .retrieve(Category::MeetingNotes, "q")
            .await;

        assert_eq!(source.params(), vec![(3, false)]);
    }
}
