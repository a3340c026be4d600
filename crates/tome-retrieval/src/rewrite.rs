//! Query rewriting and decomposition.
//!
//! Resolves anaphora against recent conversation turns and splits comparative
//! or multi-part questions into self-contained sub-questions. Tiered like the
//! analyzer: model first, a conservative splitter when the model is down, and
//! the literal question as the final tier. Never returns an empty set.

use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use tome_core::config::RetrievalConfig;
use tome_core::models::ConversationHistory;
use tome_core::traits::{CompletionRequest, ICompletionModel};

use crate::reasoning::{complete_with_retry, parse_json_response};

const MAX_SUB_QUESTIONS: usize = 4;

#[derive(Debug, Deserialize)]
struct Decomposition {
    sub_questions: Vec<String>,
}

/// Rewrites the raw user question into one or more retrieval-ready
/// sub-question texts. Strategy assignment happens downstream, per
/// sub-question.
pub struct QueryRewriter {
    model: Arc<dyn ICompletionModel>,
    config: RetrievalConfig,
}

impl QueryRewriter {
    pub fn new(model: Arc<dyn ICompletionModel>, config: RetrievalConfig) -> Self {
        Self { model, config }
    }

    /// Decompose a question. Guaranteed non-empty: the final tier returns the
    /// question verbatim.
    pub fn rewrite(&self, question: &str, history: &ConversationHistory) -> Vec<String> {
        if self.model.is_available() {
            match self.rewrite_with_model(question, history) {
                Ok(sub_questions) if !sub_questions.is_empty() => {
                    debug!(
                        question,
                        count = sub_questions.len(),
                        tier = "model",
                        "question decomposed"
                    );
                    return sub_questions;
                }
                Ok(_) => {
                    warn!(question, "model returned no sub-questions, trying splitter");
                }
                Err(e) => {
                    warn!(error = %e, "model decomposition failed, trying splitter");
                }
            }
        }

        if let Some(parts) = split_comparative(question) {
            debug!(question, count = parts.len(), tier = "splitter", "question decomposed");
            return parts;
        }

        vec![question.trim().to_string()]
    }

    fn rewrite_with_model(
        &self,
        question: &str,
        history: &ConversationHistory,
    ) -> tome_core::TomeResult<Vec<String>> {
        let request = CompletionRequest::new(
            decomposition_prompt(question, history, self.config.history_window),
            self.config.reasoning_timeout(),
        );
        let response = complete_with_retry(self.model.as_ref(), &request)?;
        let parsed: Decomposition = parse_json_response(&response)?;
        Ok(parsed
            .sub_questions
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .take(MAX_SUB_QUESTIONS)
            .collect())
    }
}

fn decomposition_prompt(question: &str, history: &ConversationHistory, window: usize) -> String {
    let history_block = if history.is_empty() {
        String::new()
    } else {
        format!(
            "Recent conversation (resolve pronouns and references against it):\n{}\n\n",
            history.render(window)
        )
    };
    format!(
        "{history_block}Rewrite this question about uploaded documents into \
         self-contained sub-questions for retrieval.\n\
         \n\
         Question: {question}\n\
         \n\
         Rules:\n\
         - Keep a simple question as a single sub-question.\n\
         - Split comparisons and multi-part questions, one aspect each.\n\
         - Replace pronouns with the entities they refer to.\n\
         - At most {MAX_SUB_QUESTIONS} sub-questions.\n\
         \n\
         Reply with only a JSON object: {{\"sub_questions\": [\"...\"]}}"
    )
}

/// Conservative comparison splitter for the no-model tier. Only fires on
/// explicit comparative phrasing; everything else passes through whole.
fn split_comparative(question: &str) -> Option<Vec<String>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:compare|difference between|contrast)\s+(.+?)\s+(?:and|versus|vs\.?|with)\s+(.+?)[?.]?\s*$",
        )
        .unwrap_or_else(|_| unreachable!("static pattern"))
    });
    let caps = re.captures(question)?;
    let (a, b) = (caps[1].trim().to_string(), caps[2].trim().to_string());
    if a.is_empty() || b.is_empty() {
        return None;
    }
    Some(vec![a, b])
}

/// Find an explicit document mention in the question and resolve it against
/// the session's known document names, case-insensitively. An unverifiable
/// mention is ignored rather than applied as a filter that matches nothing.
pub fn extract_document_filter(question: &str, known: &BTreeSet<String>) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)\b([A-Za-z0-9_\-]+\.(?:pdf|docx?|xlsx?|txt|md))\b")
            .unwrap_or_else(|_| unreachable!("static pattern"))
    });
    let mention = re.captures(question)?.get(1)?.as_str();
    known
        .iter()
        .find(|name| name.eq_ignore_ascii_case(mention))
        .cloned()
}
