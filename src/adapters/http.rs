use crate::core::image::{extension_for, sniff_mime};
use crate::core::{ConfigProvider, GenerationRequest, ImageGenerator, ResponseFormat, Storage};
use crate::utils::error::{OgError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://og-image-backend.vercel.app/generate-og-image";

#[derive(Debug, Deserialize)]
struct HostedImage {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

/// Talks to the OG image service over HTTP.
pub struct HttpImageGenerator<S: Storage> {
    endpoint: String,
    response_format: ResponseFormat,
    storage: S,
    client: Client,
}

impl<S: Storage> HttpImageGenerator<S> {
    pub fn new(endpoint: impl Into<String>, response_format: ResponseFormat, storage: S) -> Self {
        Self {
            endpoint: endpoint.into(),
            response_format,
            storage,
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C, storage: S) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: config.endpoint().to_string(),
            response_format: config.response_format(),
            storage,
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn read_hosted_url(&self, response: reqwest::Response) -> Result<String> {
        let body: HostedImage = response
            .json()
            .await
            .map_err(|e| OgError::InvalidResponse {
                message: format!("expected JSON with imageUrl: {}", e),
            })?;

        body.image_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| OgError::InvalidResponse {
                message: "imageUrl missing from response".to_string(),
            })
    }

    async fn store_image_bytes(&self, response: reqwest::Response) -> Result<String> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Err(OgError::InvalidResponse {
                message: "empty image body".to_string(),
            });
        }

        let extension = match content_type.as_deref().map(extension_for) {
            Some(ext) if ext != "bin" => ext,
            _ => extension_for(sniff_mime(&bytes)),
        };
        let name = format!(
            "og-image-{}.{}",
            Utc::now().format("%Y%m%d-%H%M%S%3f"),
            extension
        );

        tracing::debug!("Saving {} byte image as {}", bytes.len(), name);
        self.storage.write_file(&name, &bytes).await
    }
}

#[async_trait]
impl<S: Storage> ImageGenerator for HttpImageGenerator<S> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!(
            "Making API request to: {} (title: {} chars, content: {} chars, image: {} chars)",
            self.endpoint,
            request.title.len(),
            request.content.len(),
            request.image_url.len()
        );

        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(OgError::Status {
                status: status.as_u16(),
            });
        }

        match self.response_format {
            ResponseFormat::Json => self.read_hosted_url(response).await,
            ResponseFormat::Binary => self.store_image_bytes(response).await,
        }
    }
}
