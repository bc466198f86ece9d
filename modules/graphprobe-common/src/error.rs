use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Connectivity(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// True for the one failure kind the runner handles itself.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ProbeError::Connectivity(_))
    }
}
