use crate::adapters::DEFAULT_ENDPOINT;
use crate::core::{ConfigProvider, ResponseFormat, Variant};
use crate::utils::error::{OgError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "og-preview")]
#[command(about = "Generate Open Graph preview images through an OG image service")]
pub struct CliConfig {
    #[arg(long, default_value = "", help = "Post title")]
    pub title: String,

    #[arg(long, default_value = "", help = "Post body text")]
    pub content: String,

    #[arg(long, conflicts_with = "image_url", help = "Upload a local image")]
    pub image_file: Option<PathBuf>,

    #[arg(long, help = "Link a remote image instead of uploading one")]
    pub image_url: Option<String>,

    #[arg(
        long,
        default_value = "default",
        help = "Layout: default, withBackground, topLeftImage, splitView"
    )]
    pub variant: Variant,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, value_enum, default_value_t = ResponseFormat::Json)]
    pub response_format: ResponseFormat,

    #[arg(long, default_value = "./og-images", help = "Where binary responses are saved")]
    pub output_dir: String,

    #[arg(long, help = "Give up on the service after this many seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, default_value_t = 3000)]
    pub toast_ms: u64,

    #[arg(long, default_value_t = 2000)]
    pub copy_feedback_ms: u64,

    #[arg(long, help = "Read service/storage/feedback settings from a TOML file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Copy the generated meta tags to the clipboard")]
    pub copy: bool,

    #[arg(long, help = "Print the session as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// `--copy` needs a system clipboard to write to.
    pub fn validate_copy(&self) -> Result<()> {
        if self.copy && !cfg!(feature = "clipboard") {
            return Err(OgError::ConfigError {
                message: "--copy requires og-preview built with the `clipboard` feature"
                    .to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    fn copy_feedback_duration(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_path("output_dir", &self.output_dir)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 600)?;
        }
        validate_range("toast_ms", self.toast_ms, 1, 60_000)?;
        validate_range("copy_feedback_ms", self.copy_feedback_ms, 1, 60_000)?;
        self.validate_copy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["og-preview", "--title", "Hello"]);

        assert_eq!(config.title, "Hello");
        assert_eq!(config.content, "");
        assert_eq!(config.variant, Variant::Default);
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.response_format(), ResponseFormat::Json);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.toast_duration(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_variant_and_format_flags() {
        let config = CliConfig::parse_from([
            "og-preview",
            "--variant",
            "topLeftImage",
            "--response-format",
            "binary",
            "--timeout-seconds",
            "15",
        ]);

        assert_eq!(config.variant, Variant::TopLeftImage);
        assert_eq!(config.response_format(), ResponseFormat::Binary);
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_image_sources_conflict() {
        let parsed = CliConfig::try_parse_from([
            "og-preview",
            "--image-file",
            "a.png",
            "--image-url",
            "https://example.com/a.png",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!(CliConfig::try_parse_from(["og-preview", "--variant", "diagonal"]).is_err());
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let config = CliConfig::parse_from(["og-preview", "--endpoint", "ftp://example.com"]);
        assert!(config.validate().is_err());
    }

    #[cfg(not(feature = "clipboard"))]
    #[test]
    fn test_copy_rejected_without_clipboard_support() {
        let config = CliConfig::parse_from(["og-preview", "--title", "Hello", "--copy"]);

        assert!(matches!(
            config.validate_copy(),
            Err(OgError::ConfigError { .. })
        ));
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "clipboard")]
    #[test]
    fn test_copy_accepted_with_clipboard_support() {
        let config = CliConfig::parse_from(["og-preview", "--title", "Hello", "--copy"]);
        assert!(config.validate_copy().is_ok());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_without_copy_flag_needs_no_clipboard() {
        let config = CliConfig::parse_from(["og-preview", "--title", "Hello"]);
        assert!(config.validate_copy().is_ok());
    }
}
