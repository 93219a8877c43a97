/// Static example questions surfaced by the suggestions endpoint.
#[must_use]
pub const fn suggested_questions() -> &'static [&'static str] {
    &[
        "How can I find internship opportunities in tech companies?",
        "What should I include in my internship portfolio?",
        "How to prepare for technical internship interviews?",
        "What are the most common internship interview questions?",
        "How to write an impressive internship resume?",
        "How to negotiate an internship offer effectively?",
        "What skills are most valuable for tech internships?",
        "How to write a compelling cover letter for internships?",
    ]
}

#[cfg(test)]
mod tests {
    use super::suggested_questions;

    #[test]
    fn suggestions_are_nonempty() {
        let suggestions = suggested_questions();
        assert_eq!(suggestions.len(), 8);
        assert!(suggestions.iter().all(|s| !s.trim().is_empty()));
    }
}
