use crate::embeddings::{cosine_similarity, Embedder};
use crate::error::{MatcherError, Result};
use advisor_knowledge::{Category, KnowledgeStore};
use std::sync::Arc;

/// The best-scoring knowledge category for a question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    pub category: Category,
    pub score: f32,
}

/// Scores questions against one precomputed vector per knowledge category.
///
/// The cached vectors are computed once at construction and never mutated;
/// the category set and vector set stay in 1:1 correspondence for the
/// process lifetime.
pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
    cached: Vec<(Category, Vec<f32>)>,
}

impl SemanticMatcher {
    /// Embeds every knowledge entry and caches the vectors.
    pub async fn new(embedder: Arc<dyn Embedder>, store: &KnowledgeStore) -> Result<Self> {
        let entries: Vec<_> = store.entries().collect();
        if entries.is_empty() {
            return Err(MatcherError::EmptyKnowledge);
        }

        let texts: Vec<&str> = entries.iter().map(|e| e.text).collect();
        let vectors = embedder.embed_batch(texts).await?;
        if vectors.len() != entries.len() {
            return Err(MatcherError::Other(format!(
                "Embedded {} vectors for {} knowledge entries",
                vectors.len(),
                entries.len()
            )));
        }

        let cached = entries
            .iter()
            .map(|e| e.category)
            .zip(vectors.into_iter())
            .collect();
        log::info!("Precomputed embeddings for {} categories", entries.len());

        Ok(Self { embedder, cached })
    }

    /// Embeds the case-normalized question and returns the category with
    /// the maximum cosine similarity.
    ///
    /// Ties are broken deterministically: the comparison is strictly
    /// greater, so the first category in [`Category::ALL`] order keeps an
    /// equal score. The score is floored at 0.0: confidence never goes
    /// negative even when every similarity does.
    pub async fn best_match(&self, question: &str) -> Result<BestMatch> {
        let normalized = question.to_lowercase();
        let query = self.embedder.embed(&normalized).await?;

        let mut best = BestMatch {
            category: self.cached[0].0,
            score: cosine_similarity(&query, &self.cached[0].1),
        };
        for (category, vector) in &self.cached[1..] {
            let score = cosine_similarity(&query, vector);
            if score > best.score {
                best = BestMatch {
                    category: *category,
                    score,
                };
            }
        }
        if best.score < 0.0 {
            best.score = 0.0;
        }

        log::debug!(
            "Best match for question: {} (score {:.3})",
            best.category,
            best.score
        );
        Ok(best)
    }

    /// Cached vector for a category, if the store contained it.
    #[must_use]
    pub fn cached_vector(&self, category: Category) -> Option<&[f32]> {
        self.cached
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v.as_slice())
    }

    #[must_use]
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::EmbeddingModel;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// Embedder that maps every text to the same vector, forcing a
    /// similarity tie across all categories.
    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    async fn stub_matcher(store: &KnowledgeStore) -> SemanticMatcher {
        SemanticMatcher::new(Arc::new(EmbeddingModel::new_stub()), store)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn caches_one_vector_per_category() {
        let store = KnowledgeStore::new();
        let matcher = stub_matcher(&store).await;

        for category in Category::ALL {
            let vector = matcher.cached_vector(category).unwrap();
            assert_eq!(vector.len(), matcher.embedder().dimension());
        }
    }

    #[tokio::test]
    async fn category_text_matches_its_own_vector_exactly() {
        let store = KnowledgeStore::new();
        let matcher = stub_matcher(&store).await;

        for entry in store.entries() {
            let embedded = matcher.embedder().embed(entry.text).await.unwrap();
            let cached = matcher.cached_vector(entry.category).unwrap();
            let similarity = cosine_similarity(&embedded, cached);
            assert!(
                (similarity - 1.0).abs() < 1e-6,
                "identity similarity for {} was {similarity}",
                entry.category
            );
        }
    }

    #[tokio::test]
    async fn best_match_is_case_insensitive() {
        let store = KnowledgeStore::new();
        let matcher = stub_matcher(&store).await;

        let lower = matcher
            .best_match("how do i prepare for technical interviews?")
            .await
            .unwrap();
        let upper = matcher
            .best_match("HOW DO I PREPARE FOR TECHNICAL INTERVIEWS?")
            .await
            .unwrap();
        assert_eq!(lower.category, upper.category);
        assert!((lower.score - upper.score).abs() < 1e-6);
    }

    /// Embedder whose query vectors point away from every cached vector,
    /// making all similarities negative.
    struct NegatedEmbedder;

    #[async_trait]
    impl Embedder for NegatedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![-1.0, 0.0, 0.0])
        }

        async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    #[tokio::test]
    async fn all_negative_similarities_floor_confidence_at_zero() {
        let store = KnowledgeStore::new();
        let matcher = SemanticMatcher::new(Arc::new(NegatedEmbedder), &store)
            .await
            .unwrap();

        let best = matcher.best_match("anything at all").await.unwrap();
        assert_eq!(best.category, Category::ALL[0]);
        assert_eq!(best.score, 0.0);
    }

    #[tokio::test]
    async fn equal_scores_resolve_to_first_declared_category() {
        let store = KnowledgeStore::new();
        let matcher = SemanticMatcher::new(Arc::new(ConstantEmbedder), &store)
            .await
            .unwrap();

        let best = matcher.best_match("anything at all").await.unwrap();
        assert_eq!(best.category, Category::ALL[0]);
        assert!((best.score - 1.0).abs() < 1e-6);
    }
}
