use crate::core::image::to_data_uri;
use crate::domain::model::{GenerationRequest, ImageSource, Post, PostAction, PostField, Variant};

/// Owns the post being edited.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    post: Post,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn apply(&mut self, action: PostAction) {
        match action {
            PostAction::UpdateField(PostField::Title, value) => self.post.title = value,
            PostAction::UpdateField(PostField::Content, value) => self.post.content = value,
            PostAction::UploadImage(bytes) => {
                self.post.image = ImageSource::Uploaded(to_data_uri(&bytes));
            }
            PostAction::SetImageUrl(url) => {
                self.post.image = if url.is_empty() {
                    ImageSource::None
                } else {
                    ImageSource::Remote(url)
                };
            }
            PostAction::ClearImage => self.post.image = ImageSource::None,
            PostAction::SetVariant(variant) => self.post.variant = variant,
        }
    }

    pub fn update_field(&mut self, field: PostField, value: impl Into<String>) {
        self.apply(PostAction::UpdateField(field, value.into()));
    }

    pub fn set_uploaded_image(&mut self, bytes: impl Into<Vec<u8>>) {
        self.apply(PostAction::UploadImage(bytes.into()));
    }

    pub fn set_remote_image_url(&mut self, url: impl Into<String>) {
        self.apply(PostAction::SetImageUrl(url.into()));
    }

    pub fn clear_image(&mut self) {
        self.apply(PostAction::ClearImage);
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.apply(PostAction::SetVariant(variant));
    }

    /// True when there is nothing at all to render.
    pub fn is_empty(&self) -> bool {
        self.post.title.is_empty() && self.post.content.is_empty() && self.post.image.is_none()
    }

    pub fn resolved_image_url(&self) -> &str {
        self.post.image.as_wire_value()
    }

    /// The payload sent to the image service for the current post.
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            title: self.post.title.clone(),
            content: self.post.content.clone(),
            image_url: self.resolved_image_url().to_string(),
            variant: self.post.variant,
        }
    }
}
