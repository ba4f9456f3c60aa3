//! PDF validation and base64 encoding

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Leading bytes of every PDF file
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// MIME type used in the data URL sent to the OCR service
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Base64 text of a file that passed the PDF signature check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument(String);

impl EncodedDocument {
    /// Encode raw PDF bytes. The caller is responsible for the signature check.
    fn from_bytes(data: &[u8]) -> Self {
        Self(STANDARD.encode(data))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// `data:application/pdf;base64,...` form of the document
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", PDF_MIME_TYPE, self.0)
    }
}

/// Read a file and check that it starts with `%PDF`.
///
/// Only the signature is checked; the rest of the file is returned as-is.
/// Files shorter than the signature are rejected as invalid.
pub fn read_pdf_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::PdfNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })?;

    let mut header = [0u8; 4];
    match file.read_exact(&mut header) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(Error::InvalidPdf {
                path: path.display().to_string(),
            })
        }
        Err(e) => return Err(Error::Io(e)),
    }

    if &header != PDF_MAGIC {
        return Err(Error::InvalidPdf {
            path: path.display().to_string(),
        });
    }

    file.seek(SeekFrom::Start(0))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    Ok(data)
}

/// Encode a PDF file to base64.
///
/// Returns `None` when the file is missing, unreadable or not a PDF. Each
/// failure is logged once with its classification; callers only see absence.
pub fn encode_pdf<P: AsRef<Path>>(path: P) -> Option<EncodedDocument> {
    let path = path.as_ref();

    match read_pdf_bytes(path) {
        Ok(data) => {
            tracing::debug!(path = %path.display(), bytes = data.len(), "Encoded PDF");
            Some(EncodedDocument::from_bytes(&data))
        }
        Err(Error::PdfNotFound { path }) => {
            tracing::error!(path = %path, "encode_pdf: file was not found");
            None
        }
        Err(Error::InvalidPdf { path }) => {
            tracing::error!(path = %path, "encode_pdf: file is not a valid PDF");
            None
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = ?e, "encode_pdf: failed to read file");
            None
        }
    }
}
