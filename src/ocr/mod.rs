//! OCR client layer
//!
//! [`OcrClient`] turns a file path into an [`OcrRequest`], hands it to an
//! [`OcrBackend`] and returns the backend's [`OcrResponse`]. The production
//! backend is [`MistralOcr`]; tests plug in their own.

pub mod mistral;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pdf::{encode_pdf, EncodedDocument};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub use mistral::MistralOcr;

/// Model used for every OCR request
pub const OCR_MODEL: &str = "mistral-ocr-latest";

/// Where the OCR service should read the document from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentSource {
    /// Remote or `data:` URL pointing at the document
    DocumentUrl { document_url: String },
}

/// Request body for the OCR service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrRequest {
    model: String,
    document: DocumentSource,
    include_image_base64: bool,
}

impl OcrRequest {
    /// Build a request for an encoded PDF, asking for images inline.
    pub fn for_pdf(document: &EncodedDocument) -> Self {
        Self {
            model: OCR_MODEL.to_string(),
            document: DocumentSource::DocumentUrl {
                document_url: document.data_url(),
            },
            include_image_base64: true,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn document_url(&self) -> &str {
        match &self.document {
            DocumentSource::DocumentUrl { document_url } => document_url,
        }
    }

    pub fn include_image_base64(&self) -> bool {
        self.include_image_base64
    }
}

/// Pixel size of a rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrPageDimensions {
    pub dpi: u32,
    pub height: u32,
    pub width: u32,
}

/// Image extracted from a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrImage {
    /// Identifier referenced from the page markdown
    pub id: String,
    #[serde(default)]
    pub top_left_x: Option<u32>,
    #[serde(default)]
    pub top_left_y: Option<u32>,
    #[serde(default)]
    pub bottom_right_x: Option<u32>,
    #[serde(default)]
    pub bottom_right_y: Option<u32>,
    /// Base64 image data, present when the request asked for it
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Recognised content of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrPage {
    /// Page index (0-indexed)
    pub index: u32,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub images: Vec<OcrImage>,
    #[serde(default)]
    pub dimensions: Option<OcrPageDimensions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrUsageInfo {
    pub pages_processed: u32,
    #[serde(default)]
    pub doc_size_bytes: Option<u64>,
}

/// Response from the OCR service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResponse {
    pub pages: Vec<OcrPage>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage_info: Option<OcrUsageInfo>,
}

impl OcrResponse {
    /// Page markdown in page order, separated by a blank line.
    pub fn text(&self) -> String {
        let mut pages: Vec<&OcrPage> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.index);
        pages
            .iter()
            .map(|p| p.markdown.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of images returned across all pages
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}

/// A service able to run OCR on a request
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn process(&self, request: &OcrRequest) -> Result<OcrResponse>;
}

/// Reads PDF files and runs them through an OCR backend
#[derive(Clone)]
pub struct OcrClient {
    backend: Arc<dyn OcrBackend>,
}

impl OcrClient {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self { backend }
    }

    /// Client backed by the Mistral OCR API
    pub fn mistral(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(MistralOcr::new(config)?)))
    }

    /// OCR the PDF at `path`.
    ///
    /// Returns `Ok(None)` without contacting the backend when the file is
    /// missing, unreadable or not a PDF. Backend failures are returned as
    /// errors.
    pub async fn read_document<P: AsRef<Path>>(&self, path: P) -> Result<Option<OcrResponse>> {
        let path = path.as_ref().to_path_buf();

        let encoded = tokio::task::spawn_blocking(move || encode_pdf(&path))
            .await
            .map_err(|e| Error::Task {
                reason: e.to_string(),
            })?;

        let Some(encoded) = encoded else {
            return Ok(None);
        };

        let request = OcrRequest::for_pdf(&encoded);
        tracing::debug!(
            model = request.model(),
            payload_bytes = encoded.as_str().len(),
            "Submitting OCR request"
        );

        let response = self.backend.process(&request).await?;
        tracing::info!(
            pages = response.pages.len(),
            images = response.image_count(),
            "OCR completed"
        );

        Ok(Some(response))
    }
}
