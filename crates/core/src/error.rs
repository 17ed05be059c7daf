#[derive(Debug, thiserror::Error)]
pub enum PrescriptionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("invalid record id: {0}")]
    InvalidId(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid text: {0}")]
    Text(#[from] nuskha_types::TextError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
    #[error("database connection lock poisoned")]
    LockPoisoned,
    #[error("failed to serialize: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize: {0}")]
    Deserialization(serde_json::Error),

    #[error("failed to render PDF: {0}")]
    Pdf(String),
    #[error("failed to read font file: {0}")]
    FontRead(std::io::Error),
    #[error("failed to write file: {0}")]
    FileWrite(std::io::Error),

    #[error("remote AI request failed: {0}")]
    AiRequest(#[from] reqwest::Error),
    #[error("remote AI response unusable: {0}")]
    AiResponse(String),
}

pub type PrescriptionResult<T> = std::result::Result<T, PrescriptionError>;
