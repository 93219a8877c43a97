//! # Advisor Server
//!
//! JSON HTTP boundary over [`advisor_core::Advisor`]: one chat endpoint
//! plus two read-only views (conversation summary and suggested questions).
//!
//! Every failure path returns a well-formed JSON body: empty input maps to
//! a structured error, anything else inside the pipeline maps to a fixed
//! low-confidence apology with the diagnostic attached. Errors never crash
//! the connection.

use advisor_core::{Advisor, AdvisorError};
use advisor_knowledge::suggested_questions;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed apology body for pipeline failures, paired with confidence 0.1.
const APOLOGY: &str = "I apologize, but I'm having trouble processing your question right now.\n\
     \n\
     Here are some topics I can definitely help with:\n\
     • Finding internship opportunities\n\
     • Resume and portfolio building\n\
     • Interview preparation\n\
     • Skill development\n\
     • Offer negotiation\n\
     \n\
     Please try rephrasing your question about internships and career growth!";

const APOLOGY_CONFIDENCE: f64 = 0.1;

pub const EMPTY_QUESTION_ERROR: &str = "Please enter a question";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatOutcome {
    Answer {
        answer: String,
        confidence: f64,
        conversation_count: usize,
    },
    InvalidInput {
        error: String,
    },
    Apology {
        answer: &'static str,
        confidence: f64,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: &'static [&'static str],
}

/// Builds the router over a shared advisor.
pub fn build_router(advisor: Arc<Advisor>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/conversation/summary", get(conversation_summary))
        .route("/suggestions", get(suggestions))
        .with_state(advisor)
}

async fn chat(State(advisor): State<Arc<Advisor>>, Json(request): Json<ChatRequest>) -> Json<ChatOutcome> {
    match advisor.handle(&request.question).await {
        Ok(reply) => Json(ChatOutcome::Answer {
            answer: reply.response,
            confidence: round3(reply.confidence),
            conversation_count: advisor.conversation_count(),
        }),
        Err(AdvisorError::EmptyInput) => Json(ChatOutcome::InvalidInput {
            error: EMPTY_QUESTION_ERROR.to_string(),
        }),
        Err(err) => {
            log::error!("Chat pipeline failed: {err}");
            Json(ChatOutcome::Apology {
                answer: APOLOGY,
                confidence: APOLOGY_CONFIDENCE,
                error: err.to_string(),
            })
        }
    }
}

async fn conversation_summary(State(advisor): State<Arc<Advisor>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        summary: advisor.summarize(),
    })
}

async fn suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: suggested_questions(),
    })
}

/// Boundary rounding: confidence is reported with 3 decimal places; the
/// conversation log keeps the raw score.
fn round3(confidence: f32) -> f64 {
    (f64::from(confidence) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::round3;
    use pretty_assertions::assert_eq;

    #[test]
    fn confidence_is_rounded_to_three_decimals() {
        assert_eq!(round3(0.123_456), 0.123);
        assert_eq!(round3(0.999_9), 1.0);
        assert_eq!(round3(0.1), 0.1);
    }
}
