use crate::domain::model::{Toast, ToastKind};
use crate::domain::ports::ConfigProvider;
use chrono::Utc;
use std::time::Duration;

pub const GENERATED_MESSAGE: &str = "OG image generated successfully!";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate OG image";
pub const COPIED_MESSAGE: &str = "Metadata copied to clipboard!";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy metadata";

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);
pub const DEFAULT_COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// How long transient feedback stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTiming {
    pub toast: Duration,
    pub copy_feedback: Duration,
}

impl FeedbackTiming {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            toast: config.toast_duration(),
            copy_feedback: config.copy_feedback_duration(),
        }
    }
}

impl Default for FeedbackTiming {
    fn default() -> Self {
        Self {
            toast: DEFAULT_TOAST_DURATION,
            copy_feedback: DEFAULT_COPY_FEEDBACK_DURATION,
        }
    }
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            raised_at: Utc::now(),
        }
    }
}
