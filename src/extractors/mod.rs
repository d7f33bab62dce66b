// src/extractors/mod.rs
pub mod section;
pub mod text;

// Re-export key extraction types for convenience
pub use section::{ExtractionResult, SectionBounds, SectionExtractor, NOT_FOUND_SENTINEL};
pub use text::{linearize_html, Filing};
