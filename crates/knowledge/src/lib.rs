//! # Advisor Knowledge
//!
//! Fixed internship-advice knowledge base plus the bundled question/answer
//! dataset.
//!
//! The knowledge base is a closed set of [`Category`] values, each mapped to
//! a block of advisory text. It is built once at startup and immutable
//! afterwards; the matcher caches exactly one embedding per category for the
//! process lifetime.

mod dataset;
mod store;
mod suggestions;

pub use dataset::{load_qa_pairs, DatasetError, QaPair};
pub use store::{Category, KnowledgeEntry, KnowledgeStore};
pub use suggestions::suggested_questions;
