use crate::errors::TomeResult;

/// Text embedding backend.
pub trait IEmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> TomeResult<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> TomeResult<Vec<Vec<f32>>>;
    fn dimensions(&self) -> usize;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
}
