#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod lock;
pub mod text;

// Re-export key types for convenience
pub use error::NarrationError;
pub use lock::{Acquired, NarrationLock};
pub use text::{prepare_narration, strip_markup, truncate_at_word};
