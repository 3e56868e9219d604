//! Render pipelines.
//!
//! - `sprite` draws atlas crops as alpha-blended textured quads

pub mod sprite;
