// Adapters layer: concrete implementations of the domain ports (http service, storage, clipboard).

pub mod clipboard;
pub mod http;
pub mod storage;

pub use clipboard::{MemoryClipboard, UnsupportedClipboard};
#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use http::{HttpImageGenerator, DEFAULT_ENDPOINT};
pub use storage::LocalStorage;
