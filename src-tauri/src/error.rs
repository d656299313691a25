use thiserror::Error;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported AI provider: '{0}'. Supported: gemini, claude, openai, openrouter")]
    UnsupportedProvider(String),

    #[error("Could not read document: {0}")]
    Ingestion(String),

    #[error("LLM API error: {0}")]
    Api(String),

    /// The model answered, but not with the shape we asked for.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl From<TutorError> for String {
    fn from(err: TutorError) -> Self {
        err.to_string()
    }
}

impl From<rusqlite::Error> for TutorError {
    fn from(err: rusqlite::Error) -> Self {
        TutorError::Storage(err.to_string())
    }
}
