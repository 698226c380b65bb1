pub const CLASSIFY_PROMPT: &str = "Determine the intent of the following query. Is it related to \
meeting notes, client agreements, or both? If you cannot tell, say that it is unclear. \
Provide a clear, one-line answer.\n\nQuery: {query}";

pub const SYNTHESIZE_PROMPT: &str = "The excerpts below were retrieved from an account team's \
meeting notes and client agreements. Summarize the following information into a concise and \
useful answer. Use only the excerpts; a section may be empty when nothing relevant was found \
there.\n\n{context}";

pub const FORMAT_SUMMARY_PROMPT: &str = "Format this meeting summary for optimal readability. \
Fix any merged words, standardize bullet points, ensure proper line breaks, and organize it \
into clear sections with the key points first. Preserve all information and do not add \
anything new. Reply with the formatted summary only.\n\n{summary}";

pub const MEETING_NOTES_LABEL: &str = "Meeting Notes:";
pub const CLIENT_AGREEMENTS_LABEL: &str = "Client Agreements:";

pub fn classify_prompt(query: &str) -> String {
    CLASSIFY_PROMPT.replace("{query}", query)
}

/// Both blocks are always present and labelled, meeting notes first.
pub fn synthesize_prompt(meeting_notes: &str, client_agreements: &str) -> String {
    let context = format!(
        "{}\n{}\n\n{}\n{}",
        MEETING_NOTES_LABEL, meeting_notes, CLIENT_AGREEMENTS_LABEL, client_agreements
    );
    SYNTHESIZE_PROMPT.replace("{context}", &context)
}

pub fn format_summary_prompt(summary: &str) -> String {
    FORMAT_SUMMARY_PROMPT.replace("{summary}", summary)
}
