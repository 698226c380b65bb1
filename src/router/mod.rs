pub mod intent;
pub mod prompts;
pub mod retriever;
pub mod synth;

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::docs::RetrievalClient;
use crate::error::ConfigError;
use crate::llm::CompletionClient;

use intent::{Category, IntentClassifier, LlmIntentClassifier};
use retriever::{CollectionResults, CollectionRetriever};
use synth::{Answer, AnswerSynthesizer};

/// Everything one routed query produced, for callers that want more than the text.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    pub category: Category,
    pub retrieved: CollectionResults,
    pub answer: Answer,
}

/// The two HTTP clients every part of the bot shares.
#[derive(Clone)]
pub struct ApiClients {
    pub retrieval: Arc<RetrievalClient>,
    pub completion: Arc<CompletionClient>,
}

impl ApiClients {
    /// Build both clients from `config`. Fails closed on a missing key.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let retrieval = RetrievalClient::new(
            &config.retrieval_api_key,
            &config.retrieval_base_url,
            config.request_timeout,
        )?;
        let completion = CompletionClient::new(
            &config.completion_api_key,
            &config.completion_base_url,
            &config.model,
            config.request_timeout,
        )?;
        Ok(Self {
            retrieval: Arc::new(retrieval),
            completion: Arc::new(completion),
        })
    }
}

/// Classify → retrieve → synthesize. Holds no per-query state.
pub struct QueryRouter {
    classifier: Arc<dyn IntentClassifier>,
    retriever: CollectionRetriever,
    synthesizer: AnswerSynthesizer,
}

impl QueryRouter {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        retriever: CollectionRetriever,
        synthesizer: AnswerSynthesizer,
    ) -> Self {
        Self {
            classifier,
            retriever,
            synthesizer,
        }
    }

    /// Wire the pipeline over already-built clients.
    pub fn with_clients(clients: &ApiClients, config: &Config) -> Self {
        let retriever = CollectionRetriever::new(
            clients.retrieval.clone(),
            &config.meeting_collection,
            &config.agreement_collection,
            config.top_k,
            config.rerank,
        );
        Self::new(
            Arc::new(LlmIntentClassifier::new(clients.completion.clone())),
            retriever,
            AnswerSynthesizer::new(clients.completion.clone()),
        )
    }

    pub async fn route(&self, query: &str) -> String {
        self.route_traced(query).await.answer.into_text()
    }

    pub async fn route_traced(&self, query: &str) -> RouteOutcome {
        debug!(query, "query received");

        let category = self.classifier.classify(query).await;
        debug!(%category, "query classified");

        let retrieved = self.retriever.retrieve(category, query).await;

        let answer = self
            .synthesizer
            .synthesize(&retrieved.meeting_notes, &retrieved.client_agreements)
            .await;

        info!(
            %category,
            meeting_hits = retrieved.meeting_notes.len(),
            agreement_hits = retrieved.client_agreements.len(),
            failed = answer.is_error(),
            "query routed"
        );

        RouteOutcome {
            category,
            retrieved,
            answer,
        }
    }
}
