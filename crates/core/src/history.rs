use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// One recorded question/response exchange. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    pub question: String,
    pub response: String,
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// Best similarity score found during matching, in `[0, 1]`.
    pub confidence: f32,
}

impl ConversationTurn {
    #[must_use]
    pub fn now(question: String, response: String, confidence: f32) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            question,
            response,
            timestamp,
            confidence,
        }
    }
}

/// Append-only record of all turns for the process lifetime.
///
/// Requests may run concurrently, so the append is guarded: a turn is
/// recorded fully or not at all, and `len` reads are consistent with
/// appends. Owned by the advisor, never a global.
#[derive(Default)]
pub struct ConversationLog {
    turns: Mutex<Vec<ConversationTurn>>,
}

impl ConversationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, turn: ConversationTurn) {
        self.lock().push(turn);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the most recent `n` turns, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<ConversationTurn> {
        let turns = self.lock();
        let start = turns.len().saturating_sub(n);
        turns[start..].to_vec()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ConversationTurn>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
