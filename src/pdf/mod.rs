//! PDF input layer
//!
//! Validates files by their `%PDF` signature and encodes them for transport.

mod encoder;

pub use encoder::{encode_pdf, read_pdf_bytes, EncodedDocument, PDF_MAGIC, PDF_MIME_TYPE};
