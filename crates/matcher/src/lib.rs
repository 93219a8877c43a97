//! # Advisor Matcher
//!
//! Semantic similarity matching between a free-text question and the fixed
//! advice knowledge base.
//!
//! The embedding model is a frozen black box: one vector per knowledge
//! category is computed at startup and cached for the process lifetime, and
//! each question is scored against every cached vector by cosine
//! similarity.
//!
//! Two backends are available, selected by `ADVISOR_EMBEDDING_MODE`:
//!
//! - `fast` (default): a sentence-transformer ONNX model run on ONNX
//!   Runtime (CPU),
//! - `stub`: deterministic hash-based vectors, so tests and development
//!   never need model downloads.

mod embeddings;
mod error;
mod matcher;

pub use embeddings::{cosine_similarity, Embedder, EmbeddingModel};
pub use error::{MatcherError, Result};
pub use matcher::{BestMatch, SemanticMatcher};
