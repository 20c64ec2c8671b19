use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoiAnalyzerError {
    #[error("no current month data available for comparison")]
    MissingCurrentPeriod,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NoiAnalyzerError>;
