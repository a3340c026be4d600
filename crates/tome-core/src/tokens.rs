//! Token counting for the context budget.
//!
//! Uses the cl100k_base BPE. If the encoder fails to initialize, counting
//! degrades to a whitespace approximation rather than failing the query.

use std::sync::OnceLock;

use tiktoken_rs::{cl100k_base, CoreBPE};

static BPE: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn bpe() -> Option<&'static CoreBPE> {
    BPE.get_or_init(|| cl100k_base().ok()).as_ref()
}

/// Count tokens in `text`.
pub fn count_tokens(text: &str) -> usize {
    match bpe() {
        Some(enc) => enc.encode_with_special_tokens(text).len(),
        None => text.split_whitespace().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(count_tokens(""), 0);
    }

    #[test]
    fn longer_text_has_more_tokens() {
        let short = count_tokens("budget");
        let long = count_tokens("the project budget for the fiscal year was approved");
        assert!(long > short);
    }

    #[test]
    fn deterministic() {
        assert_eq!(count_tokens("project alpha"), count_tokens("project alpha"));
    }
}
