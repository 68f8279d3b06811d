use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Config file not found: {0}. Run 'avbill init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    /// Non-2xx response from the billing API. The message is the backend's
    /// own `{ "message": ... }` body text, shown verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Failed to download PDF: {0}")]
    PdfDownload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for BillingError {
    fn from(err: ureq::Error) -> Self {
        BillingError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
