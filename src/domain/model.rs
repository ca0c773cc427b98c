use crate::utils::error::OgError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preset layout used by the service to compose the preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Variant {
    #[default]
    Default,
    WithBackground,
    TopLeftImage,
    SplitView,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Default,
        Variant::WithBackground,
        Variant::TopLeftImage,
        Variant::SplitView,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Default => "default",
            Variant::WithBackground => "withBackground",
            Variant::TopLeftImage => "topLeftImage",
            Variant::SplitView => "splitView",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = OgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| OgError::InvalidVariant(s.to_string()))
    }
}

/// Where the post image comes from. Only one source can be active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageSource {
    #[default]
    None,
    /// `data:` URI built from uploaded bytes.
    Uploaded(String),
    Remote(String),
}

impl ImageSource {
    pub fn is_none(&self) -> bool {
        matches!(self, ImageSource::None)
    }

    pub fn uploaded(&self) -> Option<&str> {
        match self {
            ImageSource::Uploaded(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn remote(&self) -> Option<&str> {
        match self {
            ImageSource::Remote(url) => Some(url),
            _ => None,
        }
    }

    /// The single value sent as `imageUrl`.
    pub fn as_wire_value(&self) -> &str {
        match self {
            ImageSource::None => "",
            ImageSource::Uploaded(uri) => uri,
            ImageSource::Remote(url) => url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub content: String,
    pub image: ImageSource,
    pub variant: Variant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Content,
}

/// Every way the post can change. All edits go through `FormState::apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAction {
    UpdateField(PostField, String),
    UploadImage(Vec<u8>),
    SetImageUrl(String),
    ClearImage,
    SetVariant(Variant),
}

/// JSON body sent to the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub title: String,
    pub content: String,
    pub image_url: String,
    #[serde(rename = "type")]
    pub variant: Variant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub image_url: String,
    pub metadata: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiStatus {
    #[default]
    Idle,
    Generating,
}
