use thiserror::Error;

pub type Result<T> = std::result::Result<T, GalaError>;

#[derive(Error, Debug)]
pub enum GalaError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid password for role '{role}'")]
    InvalidPassword { role: String },

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Operation requires admin role")]
    AdminRequired,

    #[error("Participant already exists: {qr_code}")]
    DuplicateParticipant { qr_code: String },

    #[error("Invalid donation amount: {0}")]
    InvalidAmount(f64),

    #[error("Scanner error: {0}")]
    Scanner(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GalaError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn scanner(msg: impl Into<String>) -> Self {
        Self::Scanner(msg.into())
    }
}
