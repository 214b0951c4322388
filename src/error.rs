use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Malformed archive {package}: {message}")]
    Archive { package: String, message: String },

    #[error("No packages found at: {0}")]
    NoPackages(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule error ({category}): {message}")]
    Rule { category: String, message: String },

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScanError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
