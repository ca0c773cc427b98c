use crate::adapters::DEFAULT_ENDPOINT;
use crate::core::feedback::{DEFAULT_COPY_FEEDBACK_DURATION, DEFAULT_TOAST_DURATION};
use crate::core::{ConfigProvider, ResponseFormat};
use crate::utils::error::{OgError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub response_format: ResponseFormat,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            response_format: ResponseFormat::default(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub output_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: "./og-images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub toast_ms: u64,
    pub copy_feedback_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            toast_ms: DEFAULT_TOAST_DURATION.as_millis() as u64,
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_DURATION.as_millis() as u64,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OgError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| OgError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn response_format(&self) -> ResponseFormat {
        self.service.response_format
    }

    fn timeout(&self) -> Option<Duration> {
        self.service.timeout_seconds.map(Duration::from_secs)
    }

    fn output_dir(&self) -> &str {
        &self.storage.output_dir
    }

    fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.feedback.toast_ms)
    }

    fn copy_feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback.copy_feedback_ms)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("service.endpoint", &self.service.endpoint)?;
        validate_path("storage.output_dir", &self.storage.output_dir)?;
        if let Some(timeout) = self.service.timeout_seconds {
            validate_range("service.timeout_seconds", timeout, 1, 600)?;
        }
        validate_range("feedback.toast_ms", self.feedback.toast_ms, 1, 60_000)?;
        validate_range(
            "feedback.copy_feedback_ms",
            self.feedback.copy_feedback_ms,
            1,
            60_000,
        )?;
        Ok(())
    }
}
