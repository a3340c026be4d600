//! Tiered answer validation: reasoning model first, heuristics when it fails.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use tome_core::config::ValidationConfig;
use tome_core::models::{AssembledContext, Confidence, ValidationResult};
use tome_core::traits::{CompletionRequest, IAnswerValidator, ICompletionModel};
use tome_retrieval::reasoning::{complete_with_retry, parse_json_response};

/// Phrases in an answer that signal the model could not find the information.
const UNCERTAINTY_INDICATORS: &[&str] = &[
    "i don't know",
    "i do not know",
    "not mentioned",
    "no information",
    "cannot find",
    "could not find",
    "unable to determine",
    "does not specify",
    "not provided",
    "unclear from the",
];

/// Question words implying the answer must draw on several documents.
const MULTI_SOURCE_MARKERS: &[&str] = &["both", "all the documents", "each document", "every document", "across documents"];

#[derive(Debug, Deserialize)]
struct Assessment {
    is_complete: bool,
    confidence: f64,
    reasoning: String,
}

/// Validates answer completeness against the retrieved context.
pub struct AnswerValidator {
    model: Arc<dyn ICompletionModel>,
    config: ValidationConfig,
}

impl AnswerValidator {
    pub fn new(model: Arc<dyn ICompletionModel>, config: ValidationConfig) -> Self {
        Self { model, config }
    }

    fn assess_with_model(
        &self,
        question: &str,
        answer: &str,
        context: &AssembledContext,
    ) -> tome_core::TomeResult<ValidationResult> {
        let request = CompletionRequest::new(
            assessment_prompt(question, answer, context),
            std::time::Duration::from_secs(self.config.reasoning_timeout_secs),
        );
        let response = complete_with_retry(self.model.as_ref(), &request)?;
        let assessment: Assessment = parse_json_response(&response)?;

        let confidence = Confidence::new(assessment.confidence);
        let warning = if assessment.is_complete && confidence.is_high() {
            None
        } else {
            Some(notice(context))
        };
        Ok(ValidationResult {
            is_complete: assessment.is_complete,
            confidence,
            reasoning: assessment.reasoning,
            chunk_count: context.len(),
            document_count: context.document_names().len(),
            warning,
        })
    }

    /// Cheap checks that need no model: evidence volume, uncertainty phrasing
    /// in the answer, and multi-document coverage.
    fn assess_heuristically(
        &self,
        question: &str,
        answer: &str,
        context: &AssembledContext,
    ) -> ValidationResult {
        let chunk_count = context.len();
        let document_count = context.document_names().len();
        let answer_lower = answer.to_lowercase();
        let question_lower = question.to_lowercase();

        if let Some(indicator) = UNCERTAINTY_INDICATORS
            .iter()
            .find(|i| answer_lower.contains(*i))
        {
            return ValidationResult {
                is_complete: false,
                confidence: Confidence::new(Confidence::LOW),
                reasoning: format!("answer signals missing information (\"{indicator}\")"),
                chunk_count,
                document_count,
                warning: Some(notice(context)),
            };
        }

        let min_chunks = self.config.min_chunks(context.mode.is_exhaustive());
        if chunk_count < min_chunks {
            return ValidationResult {
                is_complete: false,
                confidence: Confidence::new(Confidence::MEDIUM),
                reasoning: format!(
                    "only {chunk_count} supporting chunk(s), expected at least {min_chunks} for {} retrieval",
                    context.mode.label()
                ),
                chunk_count,
                document_count,
                warning: Some(notice(context)),
            };
        }

        if document_count < 2
            && MULTI_SOURCE_MARKERS
                .iter()
                .any(|m| question_lower.contains(m))
        {
            return ValidationResult {
                is_complete: false,
                confidence: Confidence::new(Confidence::LOW),
                reasoning: format!(
                    "question spans multiple documents but evidence comes from {document_count}"
                ),
                chunk_count,
                document_count,
                warning: Some(
                    "The answer may not reflect every relevant document.".to_string(),
                ),
            };
        }

        ValidationResult::complete(
            chunk_count,
            document_count,
            "evidence volume and answer phrasing look sufficient",
        )
    }
}

impl IAnswerValidator for AnswerValidator {
    fn validate(
        &self,
        question: &str,
        answer: &str,
        context: &AssembledContext,
    ) -> ValidationResult {
        if context.is_empty() {
            return ValidationResult {
                is_complete: false,
                confidence: Confidence::new(Confidence::LOW),
                reasoning: "no supporting content was retrieved".to_string(),
                chunk_count: 0,
                document_count: 0,
                warning: Some(
                    "No supporting content was found in the uploaded documents.".to_string(),
                ),
            };
        }

        if self.model.is_available() {
            match self.assess_with_model(question, answer, context) {
                Ok(result) => {
                    debug!(
                        complete = result.is_complete,
                        confidence = %result.confidence,
                        tier = "model",
                        "answer validated"
                    );
                    return result;
                }
                Err(e) => {
                    warn!(error = %e, "model validation failed, using heuristics");
                }
            }
        }

        let result = self.assess_heuristically(question, answer, context);
        debug!(
            complete = result.is_complete,
            confidence = %result.confidence,
            tier = "heuristic",
            "answer validated"
        );
        result
    }
}

fn assessment_prompt(question: &str, answer: &str, context: &AssembledContext) -> String {
    let documents = context
        .document_names()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Judge whether this answer fully addresses the question given the \
         retrieved evidence.\n\
         \n\
         Question: {question}\n\
         Answer: {answer}\n\
         Retrieval mode: {}\n\
         Evidence ({} chunks from: {documents}):\n{}\n\
         \n\
         An answer is incomplete if it misses part of the question, if the \
         evidence does not support it, or if a counting answer disagrees with \
         the number of matching evidence chunks.\n\
         \n\
         Reply with only a JSON object:\n\
         {{\"is_complete\": true|false, \"confidence\": 0.0-1.0, \"reasoning\": \"...\"}}",
        context.mode.label(),
        context.len(),
        context.joined_text(),
    )
}

/// The user-facing notice attached when completeness is in doubt.
fn notice(context: &AssembledContext) -> String {
    format!(
        "This answer may be incomplete: it draws on {} passage(s) from {} document(s).",
        context.len(),
        context.document_names().len()
    )
}
