use crate::history::ConversationTurn;
use crate::intent;

/// How many recent turns the summary samples for the dominant topic.
const SUMMARY_WINDOW: usize = 5;

pub const EMPTY_SUMMARY: &str = "No conversation yet. Ask me about internships!";

/// Summarizes the conversation: the most frequent primary intent over the
/// last five turns (ties broken by first-seen) and the total advice count.
///
/// Intents are recomputed from the stored questions rather than persisted
/// per turn, matching the log's minimal shape.
#[must_use]
pub fn summarize(recent: &[ConversationTurn], total_turns: usize) -> String {
    if total_turns == 0 || recent.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let topics: Vec<_> = recent
        .iter()
        .take(SUMMARY_WINDOW)
        .map(|turn| intent::primary(&turn.question.to_lowercase()))
        .collect();

    let mut top = topics[0];
    let mut top_count = 0;
    for &candidate in &topics {
        let count = topics.iter().filter(|&&t| t == candidate).count();
        if count > top_count {
            top = candidate;
            top_count = count;
        }
    }

    format!(
        "We've been discussing {top}. I've provided {total_turns} pieces of career advice."
    )
}
