//! MCP Server implementation using rmcp

use crate::config::Config;
use crate::ocr::OcrClient;
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;

/// Lizeur MCP Server
#[derive(Clone)]
pub struct LizeurServer {
    ocr: OcrClient,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Request types for read_pdf
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadPdfParams {
    /// Path to the PDF file
    pub pdf_path: String,
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl LizeurServer {
    pub fn new(ocr: OcrClient) -> Self {
        Self {
            ocr,
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server backed by the Mistral OCR API
    pub fn with_config(config: &Config) -> crate::error::Result<Self> {
        Ok(Self::new(OcrClient::mistral(config)?))
    }

    /// Read a PDF file and return the text content
    #[tool(
        description = "Read a PDF file and return the text content. The document is sent to Mistral OCR and the recognised text of every page is returned as markdown.

pdf_path: path to a PDF file on the local filesystem"
    )]
    async fn read_pdf(&self, Parameters(params): Parameters<ReadPdfParams>) -> String {
        self.process_read_pdf(&params.pdf_path).await
    }
}

impl LizeurServer {
    /// Run the OCR pipeline for one path and render the outcome as text.
    ///
    /// The tool has no structured error channel, so failures come back as a
    /// string starting with `Error:`.
    pub async fn process_read_pdf(&self, pdf_path: &str) -> String {
        match self.ocr.read_document(pdf_path).await {
            Ok(Some(response)) => response.text(),
            Ok(None) => format!("Error: {} is not a readable PDF file", pdf_path),
            Err(e) => {
                tracing::warn!(path = %pdf_path, error = %e, "read_pdf failed");
                format!("Error: {}", e.client_message())
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for LizeurServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Lizeur reads PDF files with OCR. Call read_pdf with a local file path \
                 to get the document text as markdown."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server over stdio with the given configuration
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let server = LizeurServer::with_config(&config)?;

    tracing::info!("Lizeur ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ocr::{OcrBackend, OcrPage, OcrRequest, OcrResponse};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::Arc;

    struct StaticBackend(&'static str);

    #[async_trait]
    impl OcrBackend for StaticBackend {
        async fn process(&self, _request: &OcrRequest) -> crate::error::Result<OcrResponse> {
            Ok(OcrResponse {
                pages: vec![OcrPage {
                    index: 0,
                    markdown: self.0.to_string(),
                    images: vec![],
                    dimensions: None,
                }],
                model: "mistral-ocr-latest".to_string(),
                usage_info: None,
            })
        }
    }

    struct TimeoutBackend;

    #[async_trait]
    impl OcrBackend for TimeoutBackend {
        async fn process(&self, _request: &OcrRequest) -> crate::error::Result<OcrResponse> {
            Err(Error::OcrBackend {
                status: 504,
                message: "upstream timed out at 10.0.0.3".to_string(),
            })
        }
    }

    fn server(backend: impl OcrBackend + 'static) -> LizeurServer {
        LizeurServer::new(OcrClient::new(Arc::new(backend)))
    }

    fn pdf_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_params_deserialization() {
        let params: ReadPdfParams = serde_json::from_str(r#"{"pdf_path": "/tmp/a.pdf"}"#).unwrap();
        assert_eq!(params.pdf_path, "/tmp/a.pdf");

        let result: std::result::Result<ReadPdfParams, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_info() {
        let info = server(StaticBackend("")).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.instructions.unwrap().contains("read_pdf"));
    }

    #[tokio::test]
    async fn test_process_read_pdf_returns_text() {
        let server = server(StaticBackend("# Invoice\n\nTotal: 42 EUR"));
        let file = pdf_file(b"%PDF-1.4\n...");

        let text = server
            .process_read_pdf(&file.path().to_string_lossy())
            .await;
        assert_eq!(text, "# Invoice\n\nTotal: 42 EUR");
    }

    #[tokio::test]
    async fn test_process_read_pdf_invalid_input() {
        let server = server(StaticBackend("unused"));
        let file = pdf_file(b"not a pdf");
        let path = file.path().to_string_lossy().to_string();

        let text = server.process_read_pdf(&path).await;
        assert_eq!(text, format!("Error: {} is not a readable PDF file", path));

        let text = server.process_read_pdf("/nonexistent/file.pdf").await;
        assert!(text.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_process_read_pdf_backend_error_is_sanitized() {
        let server = server(TimeoutBackend);
        let file = pdf_file(b"%PDF-1.7");

        let text = server
            .process_read_pdf(&file.path().to_string_lossy())
            .await;
        assert_eq!(text, "Error: OCR backend returned status 504");
        assert!(!text.contains("10.0.0.3"));
    }
}
