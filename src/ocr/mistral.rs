//! Mistral OCR API client

use super::{OcrBackend, OcrRequest, OcrResponse};
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use url::Url;

const OCR_ENDPOINT_PATH: &str = "v1/ocr";

/// HTTP client for `POST /v1/ocr`
pub struct MistralOcr {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl MistralOcr {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpRequest)?;
        Self::with_client(config, client)
    }

    /// Use a preconfigured HTTP client. `config.timeout` is not applied.
    pub fn with_client(config: &Config, client: reqwest::Client) -> Result<Self> {
        // Trailing slash keeps any path prefix on the base URL when joining.
        let base = Url::parse(&format!("{}/", config.api_base_url.trim_end_matches('/')))?;
        let endpoint = base.join(OCR_ENDPOINT_PATH)?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.mistral_api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl OcrBackend for MistralOcr {
    async fn process(&self, request: &OcrRequest) -> Result<OcrResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %message, "OCR request rejected");
            return Err(Error::OcrBackend {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
