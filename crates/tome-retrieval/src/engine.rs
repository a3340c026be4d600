//! The retrieval engine: orchestrates the full pipeline for one question.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use tome_core::config::RetrievalConfig;
use tome_core::errors::{RetrievalError, TomeResult};
use tome_core::models::{
    AssembledContext, Candidate, ConversationHistory, RetrievalMode, SubQuestion,
};
use tome_core::traits::{
    ICompletionModel, ICrossEncoder, IDocumentIndex, IEmbeddingProvider, IRetriever,
};

use crate::analyze::StrategyRouter;
use crate::expansion::QueryExpander;
use crate::ranking::{near_duplicate, reranker};
use crate::rewrite::{self, QueryRewriter};
use crate::search::HybridSearcher;
use crate::{assemble, exhaustive};

/// Ties the pipeline stages together:
///
/// rewrite → per-sub-question strategy routing → parallel retrieval
/// (exhaustive scan, or hybrid search + rerank) → near-duplicate filter →
/// round-robin assembly under the token budget.
///
/// The cross-encoder is optional; without one the fused hybrid order stands.
pub struct RetrievalEngine {
    index: Arc<dyn IDocumentIndex>,
    embedder: Arc<dyn IEmbeddingProvider>,
    cross_encoder: Option<Arc<dyn ICrossEncoder>>,
    router: StrategyRouter,
    rewriter: QueryRewriter,
    expander: QueryExpander,
    config: RetrievalConfig,
    pool: rayon::ThreadPool,
}

impl RetrievalEngine {
    pub fn new(
        index: Arc<dyn IDocumentIndex>,
        embedder: Arc<dyn IEmbeddingProvider>,
        model: Arc<dyn ICompletionModel>,
        cross_encoder: Option<Arc<dyn ICrossEncoder>>,
        config: RetrievalConfig,
    ) -> TomeResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("tome-retrieval-{i}"))
            .build()
            .map_err(|e| RetrievalError::WorkerPool {
                reason: e.to_string(),
            })?;
        Ok(Self {
            index,
            embedder,
            cross_encoder,
            router: StrategyRouter::new(Arc::clone(&model), config.clone()),
            rewriter: QueryRewriter::new(Arc::clone(&model), config.clone()),
            expander: QueryExpander::new(model, config.clone()),
            config,
            pool,
        })
    }

    /// Run the full pipeline for one question.
    pub fn retrieve(
        &self,
        question: &str,
        history: &ConversationHistory,
        document_filter: Option<&str>,
    ) -> TomeResult<AssembledContext> {
        // A caller-supplied filter wins over one parsed out of the question.
        let document_filter = match document_filter {
            Some(doc) => Some(doc.to_string()),
            None => {
                let known = self.index.list_document_names()?;
                rewrite::extract_document_filter(question, &known)
            }
        };

        let sub_questions = self.plan(question, history, document_filter.as_deref());
        info!(
            question,
            sub_questions = sub_questions.len(),
            document = document_filter.as_deref().unwrap_or("<all>"),
            "retrieval planned"
        );

        let lists: Vec<Vec<Candidate>> = self.pool.install(|| {
            sub_questions
                .par_iter()
                .map(|sq| self.retrieve_sub(sq))
                .collect::<TomeResult<Vec<_>>>()
        })?;

        let mode = overall_mode(&sub_questions);
        let context = assemble::assemble(&lists, self.config.context_budget_tokens, mode);
        info!(
            entries = context.len(),
            tokens = context.token_count,
            mode = mode.label(),
            "retrieval complete"
        );
        Ok(context)
    }

    /// Decompose the question and attach a strategy to each sub-question.
    fn plan(
        &self,
        question: &str,
        history: &ConversationHistory,
        document_filter: Option<&str>,
    ) -> Vec<SubQuestion> {
        self.rewriter
            .rewrite(question, history)
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let analysis = self.router.classify(&text);
                let mut strategy = analysis.strategy;
                if strategy.document_filter.is_none() {
                    strategy.document_filter = document_filter.map(String::from);
                }
                SubQuestion {
                    index,
                    text,
                    kind: analysis.kind,
                    strategy,
                }
            })
            .collect()
    }

    /// Retrieve candidates for one sub-question, already deduplicated and in
    /// final priority order for assembly.
    fn retrieve_sub(&self, sub: &SubQuestion) -> TomeResult<Vec<Candidate>> {
        match sub.strategy.mode {
            RetrievalMode::Exhaustive => {
                let candidates = exhaustive::fetch(self.index.as_ref(), &sub.strategy)?;
                Ok(near_duplicate::filter(
                    candidates,
                    self.config.dedup_threshold(true),
                ))
            }
            RetrievalMode::Semantic { top_k } => self.retrieve_semantic(sub, top_k),
        }
    }

    fn retrieve_semantic(&self, sub: &SubQuestion, top_k: usize) -> TomeResult<Vec<Candidate>> {
        let searcher = HybridSearcher::new(self.index.as_ref(), self.embedder.as_ref(), &self.config);

        let mut queries = vec![sub.text.clone()];
        queries.extend(self.expander.expand(&sub.text));

        // Merge across query variants by chunk id, keeping the best score.
        let mut merged: HashMap<String, Candidate> = HashMap::new();
        for query in &queries {
            for candidate in searcher.search(query, top_k)? {
                match merged.get_mut(&candidate.chunk.id) {
                    Some(existing) if existing.score >= candidate.score => {}
                    Some(existing) => *existing = candidate,
                    None => {
                        merged.insert(candidate.chunk.id.clone(), candidate);
                    }
                }
            }
        }

        let mut candidates: Vec<Candidate> = merged.into_values().collect();
        // The index has no per-document search path; filter after the fact.
        if let Some(doc) = sub.strategy.document_filter.as_deref() {
            candidates.retain(|c| c.chunk.document_name == doc);
        }
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        candidates.truncate(top_k);

        if let Some(encoder) = self.cross_encoder.as_deref() {
            candidates = reranker::rerank(&sub.text, candidates, encoder);
        }
        let candidates = near_duplicate::filter(candidates, self.config.dedup_threshold(false));
        debug!(
            sub_question = sub.index,
            variants = queries.len() - 1,
            kept = candidates.len(),
            "semantic retrieval complete"
        );
        Ok(candidates)
    }
}

/// `Exhaustive` only when every sub-question ran exhaustively; the validator
/// relies on that label as a completeness guarantee.
fn overall_mode(sub_questions: &[SubQuestion]) -> RetrievalMode {
    let all_exhaustive = !sub_questions.is_empty()
        && sub_questions.iter().all(|s| s.strategy.mode.is_exhaustive());
    if all_exhaustive {
        RetrievalMode::Exhaustive
    } else {
        let top_k = sub_questions
            .iter()
            .filter_map(|s| match s.strategy.mode {
                RetrievalMode::Semantic { top_k } => Some(top_k),
                RetrievalMode::Exhaustive => None,
            })
            .max()
            .unwrap_or(tome_core::constants::DEFAULT_SEMANTIC_TOP_K);
        RetrievalMode::Semantic { top_k }
    }
}

impl IRetriever for RetrievalEngine {
    fn retrieve(
        &self,
        question: &str,
        history: &ConversationHistory,
        document_filter: Option<&str>,
    ) -> TomeResult<AssembledContext> {
        RetrievalEngine::retrieve(self, question, history, document_filter)
    }
}
