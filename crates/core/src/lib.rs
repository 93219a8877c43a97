//! # Advisor Core
//!
//! The intent-classification and response-construction pipeline behind the
//! internship advisor.
//!
//! Per request: the question is matched against the knowledge base by
//! embedding similarity, classified into keyword intents, rendered into a
//! confidence-tiered templated reply, and recorded in the process-lifetime
//! conversation log.
//!
//! ```text
//! question ──> SemanticMatcher ──> best category + score
//!          ──> intent::detect  ──> intent list
//!          (score, category, intents) ──> compose ──> reply text
//!          reply ──> ConversationLog (append-only)
//! ```

mod advisor;
mod compose;
mod error;
mod history;
pub mod intent;
mod summary;

pub use advisor::{Advisor, AdvisorReply, THINKING_DELAY};
pub use compose::compose;
pub use error::AdvisorError;
pub use history::{ConversationLog, ConversationTurn};
pub use intent::Intent;
