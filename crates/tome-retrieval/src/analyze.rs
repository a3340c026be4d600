//! Query analysis: classify each sub-question and pick its retrieval mode.
//!
//! Tiered, best-effort classification. The reasoning model is the primary
//! classifier; a regex heuristic catches the unambiguous counting and listing
//! shapes when the model is down; the final tier always answers with bounded
//! semantic retrieval. Misclassification degrades quality, never correctness,
//! so no tier is allowed to fail the query.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use tome_core::config::RetrievalConfig;
use tome_core::models::{EntityCategory, MetadataPredicate, QuestionKind, RetrievalStrategy};
use tome_core::traits::{CompletionRequest, ICompletionModel};

use crate::reasoning::{complete_with_retry, parse_json_response};

/// Outcome of analyzing one sub-question.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub kind: QuestionKind,
    pub strategy: RetrievalStrategy,
}

/// Coarse intent reported by the model tier.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Intent {
    Enumeration,
    Factual,
    OpenEnded,
}

#[derive(Debug, Deserialize)]
struct Classification {
    intent: Intent,
    #[serde(default)]
    entity_category: Option<EntityCategory>,
    #[serde(default)]
    kind: QuestionKind,
}

/// Picks a retrieval strategy per sub-question.
pub struct StrategyRouter {
    model: Arc<dyn ICompletionModel>,
    config: RetrievalConfig,
}

impl StrategyRouter {
    pub fn new(model: Arc<dyn ICompletionModel>, config: RetrievalConfig) -> Self {
        Self { model, config }
    }

    /// Classify one sub-question. Infallible: every tier short of the default
    /// may decline or error, the default always produces a strategy.
    pub fn classify(&self, question: &str) -> Analysis {
        if self.model.is_available() {
            match self.classify_with_model(question) {
                Ok(analysis) => {
                    debug!(
                        question,
                        mode = analysis.strategy.mode.label(),
                        tier = "model",
                        "question classified"
                    );
                    return analysis;
                }
                Err(e) => {
                    warn!(error = %e, "model classification failed, trying heuristic tier");
                }
            }
        }

        if let Some(analysis) = classify_heuristic(question, &self.config) {
            debug!(
                question,
                mode = analysis.strategy.mode.label(),
                tier = "heuristic",
                "question classified"
            );
            return analysis;
        }

        debug!(question, tier = "default", "question classified");
        Analysis {
            kind: QuestionKind::General,
            strategy: RetrievalStrategy::semantic(self.config.semantic_top_k),
        }
    }

    fn classify_with_model(&self, question: &str) -> tome_core::TomeResult<Analysis> {
        let request =
            CompletionRequest::new(classification_prompt(question), self.config.reasoning_timeout());
        let response = complete_with_retry(self.model.as_ref(), &request)?;
        let parsed: Classification = parse_json_response(&response)?;
        Ok(self.analysis_from(parsed))
    }

    fn analysis_from(&self, parsed: Classification) -> Analysis {
        match parsed.intent {
            Intent::Enumeration => Analysis {
                kind: match parsed.kind {
                    QuestionKind::General => QuestionKind::List,
                    other => other,
                },
                strategy: RetrievalStrategy::exhaustive(
                    parsed.entity_category.map(MetadataPredicate::for_entity),
                    None,
                ),
            },
            Intent::Factual => Analysis {
                kind: parsed.kind,
                strategy: RetrievalStrategy::semantic(self.config.semantic_top_k),
            },
            Intent::OpenEnded => Analysis {
                kind: parsed.kind,
                strategy: RetrievalStrategy::semantic(self.config.broad_top_k),
            },
        }
    }
}

fn classification_prompt(question: &str) -> String {
    format!(
        "Classify this question about uploaded documents.\n\
         \n\
         Question: {question}\n\
         \n\
         Reply with only a JSON object:\n\
         {{\"intent\": \"enumeration\" | \"factual\" | \"open_ended\",\n\
          \"entity_category\": \"projects\" | \"people\" | \"dates\" | \"locations\" | null,\n\
          \"kind\": \"count\" | \"list\" | \"timeline\" | \"general\"}}\n\
         \n\
         \"enumeration\" means the answer requires finding EVERY matching item \
         (counting, listing, full timelines). \"factual\" means one specific \
         fact answers it. \"open_ended\" asks for explanation or summary. \
         Set entity_category only for enumeration questions."
    )
}

fn count_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(how many|count of|number of|total number|how much in total)\b")
            .unwrap_or_else(|_| unreachable!("static pattern"))
    })
}

fn list_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(list (?:all|every|the)|enumerate|name (?:all|every)|what are all)\b")
            .unwrap_or_else(|_| unreachable!("static pattern"))
    })
}

fn timeline_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(timeline|chronolog|in what order|sequence of events)\b")
            .unwrap_or_else(|_| unreachable!("static pattern"))
    })
}

fn open_ended_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(explain|describe|overview|summari[sz]e|tell me about)\b")
            .unwrap_or_else(|_| unreachable!("static pattern"))
    })
}

/// Keyword-based entity category guess for the heuristic tier.
fn guess_entity(question: &str) -> Option<EntityCategory> {
    static RE: OnceLock<Vec<(Regex, EntityCategory)>> = OnceLock::new();
    let table = RE.get_or_init(|| {
        let build = |p: &str| Regex::new(p).unwrap_or_else(|_| unreachable!("static pattern"));
        vec![
            (
                build(r"(?i)\b(projects?|initiatives?|programs?)\b"),
                EntityCategory::Projects,
            ),
            (
                build(r"(?i)\b(people|persons?|employees?|staff|members?|who)\b"),
                EntityCategory::People,
            ),
            (
                build(r"(?i)\b(dates?|deadlines?|milestones?|when)\b"),
                EntityCategory::Dates,
            ),
            (
                build(r"(?i)\b(locations?|places?|cities|city|offices?|where)\b"),
                EntityCategory::Locations,
            ),
        ]
    });
    table
        .iter()
        .find(|(re, _)| re.is_match(question))
        .map(|(_, cat)| *cat)
}

/// Regex tier: answers only for question shapes it can recognize with
/// confidence; anything ambiguous falls through to the default.
fn classify_heuristic(question: &str, config: &RetrievalConfig) -> Option<Analysis> {
    let kind = if count_pattern().is_match(question) {
        QuestionKind::Count
    } else if list_pattern().is_match(question) {
        QuestionKind::List
    } else if timeline_pattern().is_match(question) {
        QuestionKind::Timeline
    } else if open_ended_pattern().is_match(question) {
        return Some(Analysis {
            kind: QuestionKind::General,
            strategy: RetrievalStrategy::semantic(config.broad_top_k),
        });
    } else {
        return None;
    };

    let metadata_filter = match kind {
        QuestionKind::Timeline => Some(MetadataPredicate::for_entity(EntityCategory::Dates)),
        _ => guess_entity(question).map(MetadataPredicate::for_entity),
    };
    Some(Analysis {
        kind,
        strategy: RetrievalStrategy::exhaustive(metadata_filter, None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::ScriptedCompletionModel;
    use tome_core::models::RetrievalMode;

    fn router(model: ScriptedCompletionModel) -> StrategyRouter {
        StrategyRouter::new(Arc::new(model), RetrievalConfig::default())
    }

    #[test]
    fn model_enumeration_routes_exhaustive_with_entity_filter() {
        let model = ScriptedCompletionModel::new(vec![
            r#"{"intent": "enumeration", "entity_category": "projects", "kind": "count"}"#,
        ]);
        let analysis = router(model).classify("How many projects are in the budget?");
        assert_eq!(analysis.kind, QuestionKind::Count);
        assert_eq!(analysis.strategy.mode, RetrievalMode::Exhaustive);
        let filter = analysis.strategy.metadata_filter.unwrap();
        assert_eq!(filter.contains_projects, Some(true));
    }

    #[test]
    fn model_factual_routes_bounded_semantic() {
        let model =
            ScriptedCompletionModel::new(vec![r#"{"intent": "factual", "kind": "general"}"#]);
        let analysis = router(model).classify("What is the Atlas budget?");
        assert_eq!(analysis.strategy.mode, RetrievalMode::Semantic { top_k: 20 });
    }

    #[test]
    fn model_open_ended_widens_top_k() {
        let model = ScriptedCompletionModel::new(vec![r#"{"intent": "open_ended"}"#]);
        let analysis = router(model).classify("Describe the migration plan.");
        assert_eq!(analysis.strategy.mode, RetrievalMode::Semantic { top_k: 50 });
    }

    #[test]
    fn heuristic_tier_catches_counting_when_model_down() {
        let analysis =
            router(ScriptedCompletionModel::failing()).classify("How many projects are listed?");
        assert_eq!(analysis.kind, QuestionKind::Count);
        assert!(analysis.strategy.mode.is_exhaustive());
        assert_eq!(
            analysis.strategy.metadata_filter,
            Some(MetadataPredicate::for_entity(EntityCategory::Projects))
        );
    }

    #[test]
    fn heuristic_timeline_filters_on_dates() {
        let analysis =
            router(ScriptedCompletionModel::failing()).classify("Give me the project timeline.");
        assert_eq!(analysis.kind, QuestionKind::Timeline);
        assert_eq!(
            analysis.strategy.metadata_filter,
            Some(MetadataPredicate::for_entity(EntityCategory::Dates))
        );
    }

    #[test]
    fn default_tier_is_bounded_semantic() {
        let analysis = router(ScriptedCompletionModel::failing())
            .classify("budget alignment considerations");
        assert_eq!(analysis.kind, QuestionKind::General);
        assert_eq!(analysis.strategy.mode, RetrievalMode::Semantic { top_k: 20 });
    }

    #[test]
    fn malformed_model_response_falls_through() {
        let model = ScriptedCompletionModel::new(vec!["not json"]);
        let analysis = router(model).classify("How many people attended?");
        assert_eq!(analysis.kind, QuestionKind::Count);
        assert!(analysis.strategy.mode.is_exhaustive());
    }
}
