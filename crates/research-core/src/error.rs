use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResearchError {
    /// Caller-supplied parameters the engines refuse to coerce.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stock record (or the catalog holding it) is incomplete or inconsistent.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResearchError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ResearchError::InvalidInput(_))
    }

    pub fn is_data_integrity(&self) -> bool {
        matches!(self, ResearchError::DataIntegrity(_))
    }
}
