//! Error types for Lizeur

use thiserror::Error;

/// Result type alias for Lizeur
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Lizeur
#[derive(Error, Debug)]
pub enum Error {
    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// File exists but does not start with the PDF signature
    #[error("Invalid PDF file: {path}")]
    InvalidPdf { path: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required setting absent from the settings file and environment
    #[error("{key} is not set")]
    MissingConfig { key: String },

    /// Setting present but unusable
    #[error("Invalid value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// OCR service answered with a non-success status
    #[error("OCR backend returned {status}: {message}")]
    OcrBackend { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed OCR endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Blocking task failed to complete
    #[error("Task join error: {reason}")]
    Task { reason: String },
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Internal details (paths, library errors, response bodies) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::PdfNotFound { .. } => "PDF not found".to_string(),
            Error::InvalidPdf { .. } => "Invalid PDF file".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::MissingConfig { key } => format!("{} is not set", key),
            Error::InvalidConfig { key, .. } => format!("Invalid value for {}", key),
            Error::HttpRequest(e) if e.is_timeout() => "OCR request timed out".to_string(),
            Error::HttpRequest(_) => "OCR request failed".to_string(),
            Error::OcrBackend { status, .. } => {
                format!("OCR backend returned status {}", status)
            }
            Error::Serialization(_) => "Malformed OCR response".to_string(),
            Error::InvalidUrl(_) => "Invalid OCR endpoint URL".to_string(),
            Error::Task { .. } => "Internal error".to_string(),
        }
    }
}
