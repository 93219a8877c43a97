use crate::compose::compose;
use crate::error::AdvisorError;
use crate::history::{ConversationLog, ConversationTurn};
use crate::intent;
use crate::summary;
use advisor_knowledge::KnowledgeStore;
use advisor_matcher::SemanticMatcher;
use std::sync::Arc;
use std::time::Duration;

/// Deliberate pause before a reply is composed, simulating "thinking".
/// Part of the observable contract; tests inject zero.
pub const THINKING_DELAY: Duration = Duration::from_millis(1500);

/// A composed reply plus the raw confidence that shaped it.
#[derive(Debug, Clone)]
pub struct AdvisorReply {
    pub response: String,
    pub confidence: f32,
}

/// Orchestrates the per-request pipeline: match, classify, compose, log.
pub struct Advisor {
    matcher: SemanticMatcher,
    knowledge: Arc<KnowledgeStore>,
    history: ConversationLog,
    thinking_delay: Duration,
}

impl Advisor {
    #[must_use]
    pub fn new(matcher: SemanticMatcher, knowledge: Arc<KnowledgeStore>) -> Self {
        Self {
            matcher,
            knowledge,
            history: ConversationLog::new(),
            thinking_delay: THINKING_DELAY,
        }
    }

    /// Overrides the simulated thinking pause (tests pass zero).
    #[must_use]
    pub const fn with_thinking_delay(mut self, delay: Duration) -> Self {
        self.thinking_delay = delay;
        self
    }

    /// Answers one question.
    ///
    /// Empty or whitespace-only input fails with [`AdvisorError::EmptyInput`]
    /// before anything else runs; the log is untouched. On success the turn
    /// is appended atomically, so a concurrent reader never observes a
    /// partial record. Pipeline failures are surfaced without logging the
    /// turn.
    pub async fn handle(&self, question: &str) -> Result<AdvisorReply, AdvisorError> {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return Err(AdvisorError::EmptyInput);
        }

        tokio::time::sleep(self.thinking_delay).await;

        let normalized = trimmed.to_lowercase();
        let best = self.matcher.best_match(&normalized).await?;
        let intents = intent::detect(&normalized);
        log::debug!(
            "Question matched {} at {:.3} with intents {:?}",
            best.category,
            best.score,
            intents
        );

        let response = compose(&normalized, &intents, Some(best.category), best.score);
        self.history.append(ConversationTurn::now(
            trimmed.to_string(),
            response.clone(),
            best.score,
        ));

        Ok(AdvisorReply {
            response,
            confidence: best.score,
        })
    }

    /// Dominant recent topic plus total advice count.
    #[must_use]
    pub fn summarize(&self) -> String {
        summary::summarize(&self.history.recent(5), self.history.len())
    }

    #[must_use]
    pub fn conversation_count(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_knowledge::Category;
    use advisor_matcher::{Embedder, MatcherError};
    use async_trait::async_trait;

    /// Deterministic embedder for pipeline tests: each knowledge text maps
    /// to its own basis vector, and questions map to the sum of the basis
    /// vectors whose keywords they contain.
    struct FixtureEmbedder;

    impl FixtureEmbedder {
        fn encode(text: &str) -> Vec<f32> {
            let dims = Category::ALL.len();

            // Exact knowledge texts (cached at matcher construction).
            for (idx, category) in Category::ALL.iter().enumerate() {
                if text == category.advice() {
                    let mut v = vec![0.0; dims];
                    v[idx] = 1.0;
                    return v;
                }
            }

            let lower = text.to_lowercase();
            let keyword_axes: [(&str, usize); 6] = [
                ("find", 0),
                ("opportunit", 0),
                ("portfolio", 1),
                ("interview", 2),
                ("resume", 4),
                ("negotiat", 5),
            ];
            let mut v = vec![0.0; dims];
            for (keyword, axis) in keyword_axes {
                if lower.contains(keyword) {
                    v[axis] = 1.0;
                }
            }
            if v.iter().all(|&x| x == 0.0) {
                v = vec![1.0; dims];
            }
            v
        }
    }

    #[async_trait]
    impl Embedder for FixtureEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, MatcherError> {
            Ok(Self::encode(text))
        }

        async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>, MatcherError> {
            Ok(texts.iter().map(|t| Self::encode(t)).collect())
        }

        fn dimension(&self) -> usize {
            Category::ALL.len()
        }
    }

    /// Embedder whose query path always fails, for pipeline-error mapping.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, MatcherError> {
            Err(MatcherError::EmbeddingError("model exploded".to_string()))
        }

        async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>, MatcherError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    async fn fixture_advisor() -> Advisor {
        let knowledge = Arc::new(KnowledgeStore::new());
        let matcher = SemanticMatcher::new(Arc::new(FixtureEmbedder), &knowledge)
            .await
            .unwrap();
        Advisor::new(matcher, knowledge).with_thinking_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn empty_and_whitespace_questions_are_rejected_without_logging() {
        let advisor = fixture_advisor().await;

        assert!(matches!(
            advisor.handle("").await,
            Err(AdvisorError::EmptyInput)
        ));
        assert!(matches!(
            advisor.handle("   ").await,
            Err(AdvisorError::EmptyInput)
        ));
        assert_eq!(advisor.conversation_count(), 0);
    }

    #[tokio::test]
    async fn internship_search_question_resolves_end_to_end() {
        let advisor = fixture_advisor().await;

        let reply = advisor
            .handle("How to find internship opportunities?")
            .await
            .unwrap();

        assert!(reply.confidence > 0.5);
        assert!(reply.response.contains("Confidence level"));
        assert!(reply.response.contains('%'));
        assert!(reply
            .response
            .contains("Strategies to find internship opportunities"));
        assert_eq!(advisor.conversation_count(), 1);
    }

    #[tokio::test]
    async fn pipeline_failures_surface_without_logging_the_turn() {
        let knowledge = Arc::new(KnowledgeStore::new());
        let matcher = SemanticMatcher::new(Arc::new(FailingEmbedder), &knowledge)
            .await
            .unwrap();
        let advisor = Advisor::new(matcher, knowledge).with_thinking_delay(Duration::ZERO);

        let err = advisor.handle("find me an internship").await.unwrap_err();
        assert!(matches!(err, AdvisorError::Pipeline(_)));
        assert!(err.to_string().contains("model exploded"));
        assert_eq!(advisor.conversation_count(), 0);
    }

    #[tokio::test]
    async fn summary_reports_dominant_topic_over_five_turns() {
        let advisor = fixture_advisor().await;
        assert_eq!(
            advisor.summarize(),
            "No conversation yet. Ask me about internships!"
        );

        for _ in 0..5 {
            advisor
                .handle("How to find internship opportunities?")
                .await
                .unwrap();
        }

        assert_eq!(
            advisor.summarize(),
            "We've been discussing finding_internships. I've provided 5 pieces of career advice."
        );
    }

    #[tokio::test]
    async fn concurrent_requests_each_record_exactly_one_turn() {
        let advisor = Arc::new(fixture_advisor().await);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let advisor = advisor.clone();
            handles.push(tokio::spawn(async move {
                advisor
                    .handle("How to find internship opportunities?")
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(advisor.conversation_count(), 8);
    }
}
