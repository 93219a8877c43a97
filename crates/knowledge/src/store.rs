use crate::dataset::{load_qa_pairs, QaPair};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Closed set of advice categories the matcher can resolve a question to.
///
/// The declaration order is the store's iteration order; the matcher relies
/// on it being stable to make tie-breaking deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FindingInternships,
    PortfolioCreation,
    InterviewPreparation,
    CommonQuestions,
    ResumeTips,
    NegotiationStrategies,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::FindingInternships,
        Self::PortfolioCreation,
        Self::InterviewPreparation,
        Self::CommonQuestions,
        Self::ResumeTips,
        Self::NegotiationStrategies,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FindingInternships => "finding_internships",
            Self::PortfolioCreation => "portfolio_creation",
            Self::InterviewPreparation => "interview_preparation",
            Self::CommonQuestions => "common_questions",
            Self::ResumeTips => "resume_tips",
            Self::NegotiationStrategies => "negotiation_strategies",
        }
    }

    /// Advisory text for this category. Exhaustive by construction, so a
    /// missing mapping is a compile error rather than a runtime lookup miss.
    #[must_use]
    pub const fn advice(self) -> &'static str {
        match self {
            Self::FindingInternships => {
                "Strategies to find internship opportunities:\n\
                 1. LinkedIn - Follow companies, use job search, connect with recruiters\n\
                 2. Company Career Pages - Direct applications on official websites\n\
                 3. University Career Centers - Campus recruitment and job portals\n\
                 4. Networking Events - Career fairs, tech meetups, hackathons\n\
                 5. Referrals - Connect with alumni and professionals in your network\n\
                 6. Online Platforms - Indeed, Glassdoor, AngelList, Internshala\n\
                 7. Cold Emailing - Reach out to hiring managers directly"
            }
            Self::PortfolioCreation => {
                "Essential elements for internship portfolio:\n\
                 • Projects with GitHub links and live demos\n\
                 • Technical skills and proficiency levels\n\
                 • Certifications and online course completions\n\
                 • Academic projects and research work\n\
                 • Resume and contact information\n\
                 • Blog or technical writing samples\n\
                 • Recommendations or testimonials if available"
            }
            Self::InterviewPreparation => {
                "Technical internship interview preparation:\n\
                 • Practice coding problems (arrays, strings, linked lists, trees)\n\
                 • Review data structures and algorithms\n\
                 • Study system design basics\n\
                 • Prepare for behavioral questions (STAR method)\n\
                 • Research the company and its products\n\
                 • Prepare questions to ask the interviewer\n\
                 • Mock interviews with peers or mentors"
            }
            Self::CommonQuestions => {
                "Common internship interview questions:\n\
                 Technical:\n\
                 - Explain [technology] you used in projects\n\
                 - Solve this coding problem\n\
                 - How would you optimize this code?\n\
                 \n\
                 Behavioral:\n\
                 - Tell me about yourself\n\
                 - Why do you want to work here?\n\
                 - Describe a challenging project\n\
                 - How do you handle conflicts?\n\
                 - Where do you see yourself in 5 years?"
            }
            Self::ResumeTips => {
                "Internship resume best practices:\n\
                 • One-page limit, clean formatting\n\
                 • Relevant projects with technologies used\n\
                 • Technical skills section (programming languages, tools, frameworks)\n\
                 • Education with GPA (if good)\n\
                 • Work experience (even if unrelated, highlight transferable skills)\n\
                 • Extracurricular activities and leadership roles\n\
                 • Certifications and online courses"
            }
            Self::NegotiationStrategies => {
                "Internship offer negotiation tips:\n\
                 1. Research typical stipends for similar roles\n\
                 2. Consider the entire package (learning, mentorship, future opportunities)\n\
                 3. Be professional and appreciative in communication\n\
                 4. Highlight your unique value and skills\n\
                 5. Consider asking for specific learning opportunities\n\
                 6. Get multiple offers for leverage\n\
                 7. Know your minimum acceptable offer"
            }
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One category with its advisory text.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnowledgeEntry {
    pub category: Category,
    pub text: &'static str,
}

/// The fixed knowledge base plus the bundled QA dataset.
///
/// Immutable after construction. Iteration follows [`Category::ALL`] order.
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
    dataset: Vec<QaPair>,
}

impl KnowledgeStore {
    /// Builds the store with the embedded QA dataset only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dataset(crate::dataset::default_qa_pairs())
    }

    /// Builds the store, loading the QA dataset from `path`. A missing or
    /// malformed file falls back to the embedded default set; either way the
    /// store is fully populated before any request is served.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::with_dataset(load_qa_pairs(path))
    }

    fn with_dataset(dataset: Vec<QaPair>) -> Self {
        let entries = Category::ALL
            .iter()
            .map(|&category| KnowledgeEntry {
                category,
                text: category.advice(),
            })
            .collect();
        log::info!(
            "Knowledge store ready: {} categories, {} QA rows",
            Category::ALL.len(),
            dataset.len()
        );
        Self { entries, dataset }
    }

    /// Entries in stable [`Category::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn text(&self, category: Category) -> &'static str {
        category.advice()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bundled question/answer rows (file-loaded or embedded fallback).
    #[must_use]
    pub fn dataset(&self) -> &[QaPair] {
        &self.dataset
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn store_iterates_in_declaration_order() {
        let store = KnowledgeStore::new();
        let categories: Vec<Category> = store.entries().map(|e| e.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[test]
    fn every_category_has_nonempty_advice() {
        let store = KnowledgeStore::new();
        for entry in store.entries() {
            assert!(!entry.text.trim().is_empty(), "{} is empty", entry.category);
            assert_eq!(entry.text, store.text(entry.category));
        }
    }

    #[test]
    fn embedded_dataset_backs_the_store() {
        let store = KnowledgeStore::new();
        assert_eq!(store.dataset().len(), 8);
        assert!(store
            .dataset()
            .iter()
            .any(|row| row.question.contains("internship opportunities")));
    }

    #[test]
    fn category_names_are_stable() {
        assert_eq!(Category::FindingInternships.as_str(), "finding_internships");
        assert_eq!(
            Category::NegotiationStrategies.to_string(),
            "negotiation_strategies"
        );
    }
}
