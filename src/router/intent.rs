use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::prompts;
use crate::llm::Completer;

/// Which document collection(s) a query concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    MeetingNotes,
    ClientAgreements,
    Both,
    Unrecognized,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::MeetingNotes => "meeting notes",
            Category::ClientAgreements => "client agreements",
            Category::Both => "both",
            Category::Unrecognized => "unrecognized",
        };
        f.write_str(label)
    }
}

impl Category {
    /// Lenient substring match over a free-text model reply.
    ///
    /// A reply naming both a meeting marker and an agreement marker counts as
    /// `Both` even without the literal word. An "unclear" reply is
    /// `Unrecognized` whatever else it mentions.
    pub fn from_reply(reply: &str) -> Self {
        let text = reply.to_lowercase();
        if text.contains("unclear") {
            return Category::Unrecognized;
        }

        let meeting = text.contains("meeting");
        let agreement = text.contains("client") || text.contains("agreement");

        if text.contains("both") || (meeting && agreement) {
            Category::Both
        } else if meeting {
            Category::MeetingNotes
        } else if agreement {
            Category::ClientAgreements
        } else {
            Category::Unrecognized
        }
    }
}

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, query: &str) -> Category;
}

/// Asks the completion model which collection a query is about.
pub struct LlmIntentClassifier {
    llm: Arc<dyn Completer>,
}

impl LlmIntentClassifier {
    pub fn new(llm: Arc<dyn Completer>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(&self, query: &str) -> Category {
        match self.llm.complete(&prompts::classify_prompt(query)).await {
            Ok(reply) => {
                let category = Category::from_reply(&reply);
                debug!(reply = reply.trim(), %category, "intent classified");
                category
            }
            Err(e) => {
                // Fail open: an unknown intent searches every collection.
                warn!(error = %e, "Intent classification failed");
                Category::Unrecognized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::testing::ScriptedCompleter;

    #[test]
    fn test_from_reply_markers() {
        assert_eq!(
            Category::from_reply("This query is about Meeting Notes."),
            Category::MeetingNotes
        );
        assert_eq!(
            Category::from_reply("It concerns client agreements"),
            Category::ClientAgreements
        );
        assert_eq!(
            Category::from_reply("The signed agreement"),
            Category::ClientAgreements
        );
        assert_eq!(Category::from_reply("Both."), Category::Both);
        assert_eq!(Category::from_reply("Unclear"), Category::Unrecognized);
        assert_eq!(Category::from_reply(""), Category::Unrecognized);
    }

    #[test]
    fn test_from_reply_unclear_wins_over_single_marker() {
        assert_eq!(
            Category::from_reply("It is unclear whether this relates to meeting notes."),
            Category::Unrecognized
        );
        assert_eq!(
            Category::from_reply("Unclear, possibly a client agreement question"),
            Category::Unrecognized
        );
    }

    #[test]
    fn test_from_reply_both_markers_without_word() {
        assert_eq!(
            Category::from_reply("Meeting notes and client agreements"),
            Category::Both
        );
    }

    #[tokio::test]
    async fn test_meeting_variants_classified_as_meeting_notes() {
        for query in ["meeting", "meetings", "Meeting?", "the last MEETING"] {
            let llm = Arc::new(ScriptedCompleter::new(vec![Ok(
                "This is about meeting notes.".to_string()
            )]));
            let classifier = LlmIntentClassifier::new(llm.clone());

            assert_eq!(classifier.classify(query).await, Category::MeetingNotes);

            let prompts = llm.prompts();
            assert_eq!(prompts.len(), 1);
            assert!(prompts[0].contains(query));
        }
    }

    #[tokio::test]
    async fn test_completion_error_fails_open() {
        let llm = Arc::new(ScriptedCompleter::new(vec![Err(())]));
        let classifier = LlmIntentClassifier::new(llm);

        assert_eq!(
            classifier.classify("what did we agree?").await,
            Category::Unrecognized
        );
    }
}
