//! 3D text: glyph outlines to extruded, bevelled meshes, and the builder that
//! keeps exactly one text mesh in the scene.
//!
//! # Invariants
//! - At most one text node is attached at any time.
//! - The previous text geometry is released before a new one is inserted.
//! - Nothing is built until a typeface is available.

mod builder;
mod geometry;
mod typeface;

pub use builder::{TEXT_BASE_HEIGHT, TEXT_NODE_NAME, TextMesh, TextMeshBuilder};
pub use geometry::{TextShape, build_text_geometry};
pub use typeface::{Font, PlaceholderTypeface, Typeface};

/// Errors from text geometry generation.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("invalid font data: {0}")]
    InvalidFont(String),
    #[error("tessellation failed: {0}")]
    Tessellation(String),
}
