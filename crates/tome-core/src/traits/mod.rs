//! Collaborator seams: index, embeddings, reasoning, reranking, plus the two
//! surfaces the core exposes upward.

mod cross_encoder;
mod embedding;
mod index;
mod reasoning;
mod retriever;
mod validator;

pub use cross_encoder::ICrossEncoder;
pub use embedding::IEmbeddingProvider;
pub use index::IDocumentIndex;
pub use reasoning::{CompletionRequest, ICompletionModel};
pub use retriever::IRetriever;
pub use validator::IAnswerValidator;
