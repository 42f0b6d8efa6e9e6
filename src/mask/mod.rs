//! Core sanitize/restore engine
//!
//! Pure, synchronous transformations over immutable inputs: entity spans go
//! in, placeholder-bearing text and a reverse mapping come out. No I/O, no
//! shared state, nothing retained across calls.

mod entity;
mod restorer;
mod sanitizer;


pub use entity::Entity;
pub use restorer::restore;
pub use sanitizer::{sanitize, MaskError, MaskResult, PlaceholderMap, SanitizeResult};
