use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use super::prompts;
use crate::docs::types::RetrievalResult;
use crate::llm::Completer;

pub const NO_INFORMATION: &str =
    "No relevant information was found in the meeting notes or client agreements.";
pub const ANSWER_UNAVAILABLE: &str =
    "Sorry, an answer could not be generated right now. Please try again later.";

/// Result of the synthesis step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Synthesized(String),
    /// Nothing was retrieved from either collection.
    NoInformation,
    /// The completion API failed; the only user-visible error state of a query.
    Unavailable,
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::Synthesized(text) => text,
            Answer::NoInformation => NO_INFORMATION,
            Answer::Unavailable => ANSWER_UNAVAILABLE,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Answer::Unavailable)
    }

    pub fn into_text(self) -> String {
        match self {
            Answer::Synthesized(text) => text,
            other => other.text().to_string(),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Merges passages from both collections into one answer.
pub struct AnswerSynthesizer {
    llm: Arc<dyn Completer>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn Completer>) -> Self {
        Self { llm }
    }

    pub async fn synthesize(
        &self,
        meeting_notes: &RetrievalResult,
        client_agreements: &RetrievalResult,
    ) -> Answer {
        if meeting_notes.is_empty() && client_agreements.is_empty() {
            debug!("nothing retrieved, skipping synthesis");
            return Answer::NoInformation;
        }

        let prompt = prompts::synthesize_prompt(
            &meeting_notes.joined_text(),
            &client_agreements.joined_text(),
        );
        match self.llm.complete(&prompt).await {
            Ok(text) => Answer::Synthesized(text.trim().to_string()),
            Err(e) => {
                error!(error = %e, "Answer synthesis failed");
                Answer::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::testing::ScriptedCompleter;

    fn result(collection: &str, texts: &[&str]) -> RetrievalResult {
        RetrievalResult::from_scored(
            collection,
            texts.iter().map(|t| (t.to_string(), 1.0)),
        )
    }

    #[tokio::test]
    async fn test_empty_inputs_skip_completion() {
        let llm = Arc::new(ScriptedCompleter::new(vec![]));
        let synth = AnswerSynthesizer::new(llm.clone());

        let answer = synth
            .synthesize(
                &RetrievalResult::empty("test_meetings"),
                &RetrievalResult::empty("test_client_agreements"),
            )
            .await;

        assert_eq!(answer, Answer::NoInformation);
        assert_eq!(answer.text(), NO_INFORMATION);
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_contains_labelled_blocks_in_order() {
        let llm = Arc::new(ScriptedCompleter::new(vec![Ok("merged".to_string())]));
        let synth = AnswerSynthesizer::new(llm.clone());

        let answer = synth
            .synthesize(
                &result("test_meetings", &["a", "b"]),
                &result("test_client_agreements", &["c"]),
            )
            .await;
        assert_eq!(answer, Answer::Synthesized("merged".to_string()));

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert!(prompt.contains("Meeting Notes:\na\nb"));
        assert!(prompt.contains("Client Agreements:\nc"));
        let meeting_at = prompt.find("Meeting Notes:").unwrap();
        let agreement_at = prompt.find("Client Agreements:").unwrap();
        assert!(meeting_at < agreement_at);
    }

    #[tokio::test]
    async fn test_one_side_empty_still_synthesizes() {
        let llm = Arc::new(ScriptedCompleter::new(vec![Ok("only agreements".to_string())]));
        let synth = AnswerSynthesizer::new(llm.clone());

        let answer = synth
            .synthesize(
                &RetrievalResult::empty("test_meetings"),
                &result("test_client_agreements", &["c"]),
            )
            .await;

        assert_eq!(answer.text(), "only agreements");
        assert_eq!(llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_completion_error_yields_sentinel() {
        let llm = Arc::new(ScriptedCompleter::new(vec![Err(())]));
        let synth = AnswerSynthesizer::new(llm);

        let answer = synth
            .synthesize(&result("test_meetings", &["a"]), &RetrievalResult::empty("x"))
            .await;

        assert_eq!(answer, Answer::Unavailable);
        assert!(answer.is_error());
        assert_eq!(answer.into_text(), ANSWER_UNAVAILABLE);
    }
}
