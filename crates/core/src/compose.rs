//! Confidence-tiered response templating.

use crate::intent::Intent;
use advisor_knowledge::Category;

/// Knowledge text is used only above this score; below it the reply falls
/// back to a general-advice block picked by a secondary keyword check.
const BODY_CONFIDENCE_FLOOR: f32 = 0.3;

const HIGH_CONFIDENCE: f32 = 0.7;
const MEDIUM_CONFIDENCE: f32 = 0.4;

const GENERIC_FOLLOW_UP: &str = "What other internship-related questions can I help you with today?";

const TECHNICAL_KEYWORDS: [&str; 5] =
    ["technical", "coding", "programming", "developer", "engineer"];
const PREPARATION_KEYWORDS: [&str; 3] = ["prepare", "ready", "get ready"];

const TECHNICAL_ADVICE: &str = "For technical roles, focus on:\n\
     • Building practical projects to showcase your skills\n\
     • Mastering core programming concepts\n\
     • Contributing to open-source projects\n\
     • Creating a strong GitHub portfolio\n\
     • Practicing coding interview questions regularly";

const PREPARATION_ADVICE: &str = "General internship preparation:\n\
     • Research companies thoroughly before applying\n\
     • Customize your application for each position\n\
     • Develop both technical and soft skills\n\
     • Network with professionals in your field\n\
     • Prepare for different types of interviews";

const DEFAULT_ADVICE: &str = "Successful internship hunting requires:\n\
     • Starting your search early (3-6 months in advance)\n\
     • Applying to multiple companies (20-30 applications)\n\
     • Following up on applications\n\
     • Preparing a strong online presence\n\
     • Being persistent and learning from rejections";

/// Renders the final reply: confidence phrase, body, follow-up, and the
/// confidence percentage (one decimal place). Pure function of its inputs;
/// the caller owns logging.
#[must_use]
pub fn compose(
    question_lower: &str,
    intents: &[Intent],
    category: Option<Category>,
    confidence: f32,
) -> String {
    let body = match category {
        Some(category) if confidence > BODY_CONFIDENCE_FLOOR => category.advice(),
        _ => general_advice(question_lower),
    };

    let response = format!(
        "{phrase}\n\n{body}\n\n{follow_up}\n\n*Confidence level: {percent:.1}%*",
        phrase = confidence_phrase(confidence),
        follow_up = follow_up(intents),
        percent = confidence * 100.0,
    );

    response.trim().to_string()
}

/// Thresholds are exact: 0.7 itself is medium, anything above is high.
fn confidence_phrase(confidence: f32) -> &'static str {
    if confidence > HIGH_CONFIDENCE {
        "🎯 I'm confident about this advice:"
    } else if confidence > MEDIUM_CONFIDENCE {
        "💡 Based on my career guidance expertise:"
    } else {
        "🤔 Here's my suggestion:"
    }
}

/// Fallback body for weak matches, bucketed by a secondary keyword check.
fn general_advice(question_lower: &str) -> &'static str {
    if TECHNICAL_KEYWORDS.iter().any(|w| question_lower.contains(w)) {
        TECHNICAL_ADVICE
    } else if PREPARATION_KEYWORDS.iter().any(|w| question_lower.contains(w)) {
        PREPARATION_ADVICE
    } else {
        DEFAULT_ADVICE
    }
}

/// First detected intent with a mapped follow-up wins; the generic line
/// covers intent lists with no mapping (cover letter / networking only).
fn follow_up(intents: &[Intent]) -> &'static str {
    intents
        .iter()
        .find_map(|intent| intent.follow_up())
        .unwrap_or(GENERIC_FOLLOW_UP)
}
