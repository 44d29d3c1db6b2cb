use thiserror::Error;

/// Error taxonomy for the analysis and persistence paths.
///
/// An unreadable input is not an error: the classifier reports it inside a
/// well-formed response and it becomes [`crate::analyzer::AnalysisOutcome::Unclear`].
/// The variants here cover the request itself breaking, which callers must
/// surface as a retryable notice without touching history or pinned state.
#[derive(Debug, Error)]
pub enum PantryError {
    #[error("Classifier request failed: {0}")]
    Classifier(String),

    #[error("Classifier returned HTTP {status}: {body}")]
    ClassifierStatus { status: u16, body: String },

    #[error("Classifier response did not match the expected schema: {0}")]
    ClassifierSchema(String),

    #[error("Remote store request failed: {0}")]
    Remote(String),

    #[error("Remote store returned HTTP {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("No active session")]
    NoSession,

    #[error("Feedback content is empty")]
    EmptyFeedback,
}

impl From<PantryError> for String {
    fn from(err: PantryError) -> Self {
        err.to_string()
    }
}
