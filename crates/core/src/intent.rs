//! Keyword-rule intent detection.
//!
//! Matching is plain substring containment over the case-normalized
//! question, not word-boundary matching: short triggers can fire inside
//! longer words (e.g. `learn` matches "learning"). That looseness is part
//! of the contract, inherited from the trigger lists themselves.

use serde::Serialize;

/// Coarse category of user need, inferred from keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FindingInternships,
    Portfolio,
    Interview,
    Resume,
    Skills,
    Negotiation,
    CoverLetter,
    Networking,
    GeneralAdvice,
}

impl Intent {
    /// Keyword-bearing intents, in the order `detect` reports them.
    /// `GeneralAdvice` is the fallback and carries no triggers.
    const KEYWORDED: [Self; 8] = [
        Self::FindingInternships,
        Self::Portfolio,
        Self::Interview,
        Self::Resume,
        Self::Skills,
        Self::Negotiation,
        Self::CoverLetter,
        Self::Networking,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FindingInternships => "finding_internships",
            Self::Portfolio => "portfolio",
            Self::Interview => "interview",
            Self::Resume => "resume",
            Self::Skills => "skills",
            Self::Negotiation => "negotiation",
            Self::CoverLetter => "cover_letter",
            Self::Networking => "networking",
            Self::GeneralAdvice => "general_advice",
        }
    }

    /// Trigger substrings; the intent fires when ANY is contained in the
    /// case-normalized question.
    const fn triggers(self) -> &'static [&'static str] {
        match self {
            Self::FindingInternships => &[
                "find",
                "search",
                "opportunities",
                "where to apply",
                "get internship",
                "looking for",
            ],
            Self::Portfolio => &[
                "portfolio",
                "projects",
                "github",
                "showcase",
                "demonstrate skills",
            ],
            Self::Interview => &[
                "interview",
                "technical interview",
                "prepare",
                "questions",
                "hr round",
            ],
            Self::Resume => &["resume", "cv", "curriculum vitae", "application", "apply"],
            Self::Skills => &[
                "skills",
                "learn",
                "technical skills",
                "soft skills",
                "required skills",
            ],
            Self::Negotiation => &[
                "negotiate",
                "offer",
                "salary",
                "stipend",
                "compensation",
                "accept offer",
            ],
            Self::CoverLetter => &["cover letter", "application letter", "motivation letter"],
            Self::Networking => &["network", "connect", "linkedin", "referral", "contact"],
            Self::GeneralAdvice => &[],
        }
    }

    /// Personalized follow-up question, where one is mapped. `CoverLetter`
    /// and `Networking` have none and fall through to the generic line.
    #[must_use]
    pub const fn follow_up(self) -> Option<&'static str> {
        match self {
            Self::FindingInternships => {
                Some("Would you like specific strategies for your target companies or locations?")
            }
            Self::Portfolio => {
                Some("Should I help you prioritize which projects to include in your portfolio?")
            }
            Self::Interview => Some(
                "Do you need help with technical, behavioral, or both types of interview preparation?",
            ),
            Self::Resume => Some("Would you like me to review specific sections of your resume?"),
            Self::Skills => Some(
                "Are you looking for technical skills, soft skills, or industry-specific skills?",
            ),
            Self::Negotiation => {
                Some("Do you need help with salary research or communication strategies?")
            }
            Self::GeneralAdvice => Some(
                "What specific aspect of internship hunting would you like to explore further?",
            ),
            Self::CoverLetter | Self::Networking => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detects every intent whose trigger list matches the case-normalized
/// question. Intents are non-exclusive and reported in declaration order.
/// Never empty: with no match the result is `[GeneralAdvice]`.
#[must_use]
pub fn detect(question_lower: &str) -> Vec<Intent> {
    let detected: Vec<Intent> = Intent::KEYWORDED
        .iter()
        .copied()
        .filter(|intent| {
            intent
                .triggers()
                .iter()
                .any(|trigger| question_lower.contains(trigger))
        })
        .collect();

    if detected.is_empty() {
        vec![Intent::GeneralAdvice]
    } else {
        detected
    }
}

/// The primary intent of a question: the first one `detect` reports.
#[must_use]
pub fn primary(question_lower: &str) -> Intent {
    detect(question_lower)[0]
}
