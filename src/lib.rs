pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{HttpImageGenerator, LocalStorage, MemoryClipboard};
pub use core::session::{GenerationOutcome, Session, SessionSnapshot};
pub use utils::error::{OgError, Result};
