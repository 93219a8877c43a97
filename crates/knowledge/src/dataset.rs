use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// One question/answer row from the bundled dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Dataset is empty")]
    Empty,
}

/// Loads the QA dataset from a JSON file, falling back to the embedded
/// default rows when the file is missing, unreadable, or malformed.
///
/// The fallback is logged but never surfaced as an error: startup must end
/// with a populated dataset either way.
#[must_use]
pub fn load_qa_pairs(path: impl AsRef<Path>) -> Vec<QaPair> {
    let path = path.as_ref();
    match read_qa_file(path) {
        Ok(rows) => {
            log::info!("Dataset loaded: {} rows from {}", rows.len(), path.display());
            rows
        }
        Err(err) => {
            log::warn!(
                "Failed to load dataset from {}: {err}; using embedded defaults",
                path.display()
            );
            default_qa_pairs()
        }
    }
}

fn read_qa_file(path: &Path) -> Result<Vec<QaPair>, DatasetError> {
    let raw = std::fs::read_to_string(path)?;
    let rows: Vec<QaPair> = serde_json::from_str(&raw)?;
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(rows)
}

/// The embedded default question/answer set.
#[must_use]
pub fn default_qa_pairs() -> Vec<QaPair> {
    const DEFAULTS: [(&str, &str); 8] = [
        (
            "How to find internship opportunities?",
            "Use LinkedIn, company career pages, university portals, and networking events. \
             Target specific companies and roles that match your skills.",
        ),
        (
            "What should I include in my internship portfolio?",
            "Include projects, GitHub links, technical skills, certifications, academic \
             achievements, and any relevant work experience or volunteer work.",
        ),
        (
            "How to prepare for technical interviews?",
            "Practice coding problems on LeetCode, review CS fundamentals, prepare for \
             behavioral questions, and research the company thoroughly.",
        ),
        (
            "What are common internship interview questions?",
            "Tell me about yourself, why this company, technical questions related to your \
             field, situational questions, and your strengths/weaknesses.",
        ),
        (
            "How to write a good internship resume?",
            "Focus on relevant projects, technical skills, education, any work experience. \
             Use action verbs and quantify achievements where possible.",
        ),
        (
            "How to negotiate an internship offer?",
            "Research market rates, highlight your value, be professional, consider other \
             benefits besides salary like learning opportunities or flexibility.",
        ),
        (
            "What skills are important for internships?",
            "Technical skills specific to your field, communication, problem-solving, \
             teamwork, adaptability, and willingness to learn new technologies.",
        ),
        (
            "How to write a cover letter for internship?",
            "Customize for each application, highlight relevant skills, show enthusiasm for \
             the company, and explain how you can contribute to their team.",
        ),
    ];

    DEFAULTS
        .iter()
        .map(|&(question, answer)| QaPair {
            question: question.to_string(),
            answer: answer.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_rows_from_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.json");
        std::fs::write(
            &path,
            r#"[{"question":"How to find a mentor?","answer":"Ask alumni."}]"#,
        )
        .unwrap();

        let rows = load_qa_pairs(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "How to find a mentor?");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let rows = load_qa_pairs(dir.path().join("nope.json"));
        assert_eq!(rows.len(), 8);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(load_qa_pairs(&path).len(), 8);
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.json");
        std::fs::write(&path, "[]").unwrap();
        assert_eq!(load_qa_pairs(&path).len(), 8);
    }
}
