//! Query expansion: paraphrased variants to widen semantic recall.
//!
//! Strictly best-effort. Variants only ever add candidates to the fusion
//! input; when the model is down or returns noise, search proceeds on the
//! original query alone.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use tome_core::config::RetrievalConfig;
use tome_core::traits::{CompletionRequest, ICompletionModel};

use crate::reasoning::{complete_with_retry, parse_json_response};

#[derive(Debug, Deserialize)]
struct Variants {
    variants: Vec<String>,
}

/// Generates paraphrased variants of a sub-question.
pub struct QueryExpander {
    model: Arc<dyn ICompletionModel>,
    config: RetrievalConfig,
}

impl QueryExpander {
    pub fn new(model: Arc<dyn ICompletionModel>, config: RetrievalConfig) -> Self {
        Self { model, config }
    }

    /// Paraphrased variants, excluding the original. Empty when expansion is
    /// disabled, the model fails, or it parrots the question back.
    pub fn expand(&self, question: &str) -> Vec<String> {
        if !self.config.query_expansion || self.config.max_query_variants == 0 {
            return Vec::new();
        }
        if !self.model.is_available() {
            return Vec::new();
        }

        let request = CompletionRequest::new(
            expansion_prompt(question, self.config.max_query_variants),
            self.config.reasoning_timeout(),
        );
        let parsed: Variants = match complete_with_retry(self.model.as_ref(), &request)
            .and_then(|response| parse_json_response(&response))
        {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "query expansion failed, searching original only");
                return Vec::new();
            }
        };

        let variants: Vec<String> = parsed
            .variants
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(question.trim()))
            .take(self.config.max_query_variants)
            .collect();
        debug!(question, count = variants.len(), "query variants generated");
        variants
    }
}

fn expansion_prompt(question: &str, max: usize) -> String {
    format!(
        "Paraphrase this question {max} different ways, keeping the meaning \
         identical, for document search.\n\
         \n\
         Question: {question}\n\
         \n\
         Reply with only a JSON object: {{\"variants\": [\"...\"]}}"
    )
}
