use thiserror::Error;

#[derive(Error, Debug)]
pub enum OgError {
    #[error("Image service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Image service returned status {status}")]
    Status { status: u16 },

    #[error("Image service returned an unusable response: {message}")]
    InvalidResponse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    #[error("Unknown layout variant: {0}")]
    InvalidVariant(String),

    #[error("Nothing to generate: title, content and image are all empty")]
    NothingToGenerate,

    #[error("A generation is already in progress")]
    GenerationInProgress,

    #[error("No generated image metadata to copy")]
    NothingToCopy,
}

impl OgError {
    /// Errors that make a single generation attempt fail. The workflow turns
    /// these into an error toast; any other generator error is returned as is.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            OgError::Transport(_)
                | OgError::Status { .. }
                | OgError::InvalidResponse { .. }
                | OgError::Io(_)
        )
    }

    /// Advisory only: nothing in the crate retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            OgError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            OgError::Status { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            OgError::Transport(_) => "Could not reach the OG image service".to_string(),
            OgError::Status { status } => {
                format!("The OG image service rejected the request (HTTP {})", status)
            }
            OgError::InvalidResponse { .. } => {
                "The OG image service sent a response that could not be used".to_string()
            }
            OgError::NothingToGenerate => {
                "Enter a title, some content or an image first".to_string()
            }
            OgError::GenerationInProgress => "Still generating, please wait".to_string(),
            OgError::NothingToCopy => "Generate an image before copying metadata".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            OgError::Transport(_) => "Check your network connection and the service endpoint",
            OgError::Status { status } if *status >= 500 => {
                "The service is having trouble; try again later"
            }
            OgError::Status { .. } => "Check the post fields and the selected variant",
            OgError::InvalidResponse { .. } => {
                "Check that response_format matches what the service returns"
            }
            OgError::ConfigError { .. } | OgError::InvalidConfigValue { .. } => {
                "Fix the configuration file or CLI flags"
            }
            OgError::InvalidVariant(_) => {
                "Use one of: default, withBackground, topLeftImage, splitView"
            }
            OgError::Clipboard { .. } => "Copy the metadata from the output instead",
            OgError::Io(_) => "Check that the output directory is writable",
            _ => "Adjust the input and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, OgError>;
