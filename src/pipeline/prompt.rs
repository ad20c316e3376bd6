use crate::index::ScoredChunk;
use crate::memory::{ChatMessage, ChatRole};
use crate::search::SearchResult;

pub const INTERNAL_HEADING: &str = "**Based on Internal Documents:**";
pub const WEB_HEADING: &str = "**Additional Information from Web Search:**";

const HISTORY_ANSWER_LIMIT: usize = 200;

/// Serialize recent turns as a compact Q/A transcript. Assistant answers
/// are truncated so history never dominates the prompt.
pub fn build_history(messages: &[&ChatMessage]) -> String {
    let mut history = String::new();
    for message in messages {
        match message.role {
            ChatRole::User => {
                history.push_str("Q: ");
                history.push_str(&message.content);
                history.push('\n');
            }
            ChatRole::Assistant => {
                history.push_str("A: ");
                let chars: Vec<char> = message.content.chars().collect();
                if chars.len() > HISTORY_ANSWER_LIMIT {
                    history.extend(chars[..HISTORY_ANSWER_LIMIT].iter());
                    history.push_str("...");
                } else {
                    history.push_str(&message.content);
                }
                history.push('\n');
            }
        }
    }
    history.trim_end().to_string()
}

/// Build the single provider prompt from the two labeled context blocks
/// plus conversation history. The two-part answer shape is a contract of
/// this construction: the model is instructed to emit both headings.
pub fn build_prompt(
    question: &str,
    history: &str,
    chunks: &[ScoredChunk],
    web_results: &[SearchResult],
    web_search_requested: bool,
) -> String {
    let mut prompt = String::with_capacity(4096);

    prompt.push_str(
        "You are a Company Law AI Assistant. Provide accurate, practical legal guidance.\n\n",
    );

    if !history.is_empty() {
        prompt.push_str("Previous conversation context:\n");
        prompt.push_str(history);
        prompt.push_str("\n\n");
    }

    prompt.push_str("=== INTERNAL COMPANY DOCUMENTS ===\n");
    if chunks.is_empty() {
        prompt.push_str("No internal document context is available for this question.\n");
    } else {
        for chunk in chunks {
            prompt.push_str(&format!("[Source: {}]\n{}\n---\n", chunk.document_name, chunk.content));
        }
    }
    prompt.push('\n');

    prompt.push_str("=== WEB SEARCH RESULTS ===\n");
    if !web_search_requested {
        prompt.push_str("Web search was not requested for this question.\n");
    } else if web_results.is_empty() {
        prompt.push_str("No web search results are available.\n");
    } else {
        for result in web_results {
            prompt.push_str(&format!("- {} ({})\n  {}\n", result.title, result.url, result.content));
        }
    }
    prompt.push('\n');

    prompt.push_str(&format!("Question: {}\n\n", question));

    prompt.push_str(&format!(
        "Answer in two clearly separated parts.\n\
         Start the first part with the exact heading \"{}\" and answer based ONLY on the internal \
         documents above; if no internal document context is available, state clearly that the \
         internal document collection contains no basis for this answer.\n\
         Start the second part with the exact heading \"{}\" and provide supplementary insights \
         from the web search results above; if none are available, provide brief general legal \
         guidance and say that no web results were used.",
        INTERNAL_HEADING, WEB_HEADING
    ));

    prompt
}

/// Split a two-part answer back into its internal and web components.
/// Falls back to the whole text as the internal part when the model did
/// not follow the heading contract.
pub fn split_answer(answer: &str) -> (String, String) {
    match answer.split_once(WEB_HEADING) {
        Some((internal, web)) => (
            internal.replace(INTERNAL_HEADING, "").trim().to_string(),
            web.trim().to_string(),
        ),
        None => (
            answer.replace(INTERNAL_HEADING, "").trim().to_string(),
            String::new(),
        ),
    }
}
