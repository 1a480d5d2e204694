use std::fmt;

/// Resolution-level failures. Both stop the pipeline and are shown to the
/// user as a single message in place of the results grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The query was empty or whitespace only.
    EmptyQuery,
    /// The generative-text call failed; carries the upstream error text.
    GenerationFailed(String),
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::EmptyQuery => {
                write!(f, "Please enter a keyword to search for music.")
            }
            ResolutionError::GenerationFailed(details) => {
                write!(f, "Gemini API Error: {}", details)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Failure modes of the generative-text service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    Auth(String),
    Quota(String),
    Network(String),
    Upstream { status: u16, message: String },
    Malformed(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            GenerationError::Quota(msg) => write!(f, "quota exceeded: {}", msg),
            GenerationError::Network(msg) => write!(f, "network error: {}", msg),
            GenerationError::Upstream { status, message } => {
                write!(f, "service returned {}: {}", status, message)
            }
            GenerationError::Malformed(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<GenerationError> for ResolutionError {
    fn from(err: GenerationError) -> Self {
        ResolutionError::GenerationFailed(err.to_string())
    }
}
