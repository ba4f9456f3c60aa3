//! Lizeur Library
//!
//! This crate provides an MCP server with a single tool:
//! - `read_pdf`: OCR a local PDF file with Mistral OCR and return its text
//!
//! The pipeline is split into the [`pdf`] layer (signature check and base64
//! encoding) and the [`ocr`] layer (request shaping and the OCR backend).

pub mod config;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use ocr::{OcrBackend, OcrClient, OcrRequest, OcrResponse};
pub use server::{run_server_with_config, LizeurServer, ReadPdfParams};
