use crate::domain::model::GenerationRequest;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where generated image bytes are kept when the service answers with raw bytes.
pub trait Storage: Send + Sync {
    /// Writes `data` under `name` and returns a reference a viewer can open.
    fn write_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// How the image service encodes a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ResponseFormat {
    /// `{ "imageUrl": "..." }` pointing at a hosted image.
    #[default]
    Json,
    /// Raw image bytes.
    Binary,
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn response_format(&self) -> ResponseFormat;
    /// `None` means the client waits for the service indefinitely.
    fn timeout(&self) -> Option<Duration>;
    fn output_dir(&self) -> &str;
    fn toast_duration(&self) -> Duration;
    fn copy_feedback_duration(&self) -> Duration;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Renders one preview image and returns a displayable URL for it.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
