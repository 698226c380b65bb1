use std::sync::Arc;

use tracing::warn;

use crate::llm::Completer;
use crate::router::prompts;

/// Readability pass over stored meeting summaries.
pub struct SummaryFormatter {
    llm: Arc<dyn Completer>,
}

impl SummaryFormatter {
    pub fn new(llm: Arc<dyn Completer>) -> Self {
        Self { llm }
    }

    /// Returns the cleaned-up summary, or `summary` unchanged if the model fails.
    pub async fn format(&self, summary: &str) -> String {
        match self.llm.complete(&prompts::format_summary_prompt(summary)).await {
            Ok(formatted) if !formatted.trim().is_empty() => formatted.trim().to_string(),
            Ok(_) => summary.to_string(),
            Err(e) => {
                warn!(error = %e, "Summary formatting failed, keeping original");
                summary.to_string()
            }
        }
    }
}
