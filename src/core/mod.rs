pub mod feedback;
pub mod form;
pub mod image;
pub mod metadata;
pub mod session;

pub use crate::domain::model::{
    GenerationRequest, GenerationResult, ImageSource, Post, PostAction, PostField, Toast,
    ToastKind, UiStatus, Variant,
};
pub use crate::domain::ports::{Clipboard, ConfigProvider, ImageGenerator, ResponseFormat, Storage};
pub use crate::utils::error::Result;
