use advisor_matcher::MatcherError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// The question was empty or whitespace-only after trimming. Recovered
    /// at the boundary as a structured error; never logged as a turn.
    #[error("Please enter a question")]
    EmptyInput,

    /// Catch-all for failures inside the pipeline (embedding, matching).
    /// The boundary maps this to a fixed low-confidence apology.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl From<MatcherError> for AdvisorError {
    fn from(err: MatcherError) -> Self {
        Self::Pipeline(err.to_string())
    }
}
