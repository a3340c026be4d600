//! Retrieval strategy: the closed mode enum plus filters.

use serde::{Deserialize, Serialize};

use super::chunk::ChunkFlags;

/// How a sub-question is retrieved. A closed set, exhaustively matched at
/// every dispatch site — no stringly-typed mode checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum RetrievalMode {
    /// Bounded top-K hybrid retrieval. Precision and latency first.
    Semantic { top_k: usize },
    /// Unbounded complete scan. Completeness first; top-K and reranking are
    /// deliberately bypassed.
    Exhaustive,
}

impl RetrievalMode {
    pub fn is_exhaustive(self) -> bool {
        matches!(self, Self::Exhaustive)
    }

    /// Stable label for logs and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Semantic { .. } => "semantic",
            Self::Exhaustive => "exhaustive",
        }
    }
}

/// Coarse question type, as classified by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Count,
    List,
    Timeline,
    General,
}

impl Default for QuestionKind {
    fn default() -> Self {
        Self::General
    }
}

/// Entity category a counting/listing question is about. Keys the metadata
/// filter used in exhaustive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Projects,
    People,
    Dates,
    Locations,
}

/// AND-combined metadata predicate. `None` fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataPredicate {
    pub contains_projects: Option<bool>,
    pub contains_people: Option<bool>,
    pub contains_dates: Option<bool>,
    pub contains_locations: Option<bool>,
    pub category: Option<String>,
}

impl MetadataPredicate {
    /// Predicate selecting chunks tagged with the given entity category.
    pub fn for_entity(category: EntityCategory) -> Self {
        let mut p = Self::default();
        match category {
            EntityCategory::Projects => p.contains_projects = Some(true),
            EntityCategory::People => p.contains_people = Some(true),
            EntityCategory::Dates => p.contains_dates = Some(true),
            EntityCategory::Locations => p.contains_locations = Some(true),
        }
        p
    }

    /// True when no field constrains anything (matches every chunk).
    pub fn is_empty(&self) -> bool {
        self.contains_projects.is_none()
            && self.contains_people.is_none()
            && self.contains_dates.is_none()
            && self.contains_locations.is_none()
            && self.category.is_none()
    }

    /// AND-evaluate against a chunk's flags.
    pub fn matches(&self, flags: &ChunkFlags) -> bool {
        fn check(required: Option<bool>, actual: bool) -> bool {
            required.map_or(true, |r| r == actual)
        }
        check(self.contains_projects, flags.contains_projects)
            && check(self.contains_people, flags.contains_people)
            && check(self.contains_dates, flags.contains_dates)
            && check(self.contains_locations, flags.contains_locations)
            && self
                .category
                .as_ref()
                .map_or(true, |c| flags.category.as_deref() == Some(c.as_str()))
    }
}

/// Retrieval strategy for one sub-question: mode plus optional filters.
/// Computed once by the analyzer; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalStrategy {
    pub mode: RetrievalMode,
    pub metadata_filter: Option<MetadataPredicate>,
    pub document_filter: Option<String>,
}

impl RetrievalStrategy {
    pub fn semantic(top_k: usize) -> Self {
        Self {
            mode: RetrievalMode::Semantic { top_k },
            metadata_filter: None,
            document_filter: None,
        }
    }

    pub fn exhaustive(
        metadata_filter: Option<MetadataPredicate>,
        document_filter: Option<String>,
    ) -> Self {
        Self {
            mode: RetrievalMode::Exhaustive,
            metadata_filter,
            document_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_predicate_matches_everything() {
        let p = MetadataPredicate::default();
        assert!(p.is_empty());
        assert!(p.matches(&ChunkFlags::default()));
    }

    #[test]
    fn predicate_is_and_combined() {
        let p = MetadataPredicate {
            contains_projects: Some(true),
            contains_dates: Some(true),
            ..Default::default()
        };
        let mut flags = ChunkFlags {
            contains_projects: true,
            ..Default::default()
        };
        assert!(!p.matches(&flags));
        flags.contains_dates = true;
        assert!(p.matches(&flags));
    }

    #[test]
    fn entity_predicate_selects_flag() {
        let p = MetadataPredicate::for_entity(EntityCategory::Projects);
        assert_eq!(p.contains_projects, Some(true));
        assert!(p.contains_people.is_none());
    }

    #[test]
    fn category_filter_requires_exact_match() {
        let p = MetadataPredicate {
            category: Some("budget".to_string()),
            ..Default::default()
        };
        let flags = ChunkFlags {
            category: Some("timeline".to_string()),
            ..Default::default()
        };
        assert!(!p.matches(&flags));
    }
}
