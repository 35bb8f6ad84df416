//! wgpu render backend.
//!
//! Draws the environment map as a fullscreen background, the text mesh with
//! its active material, then the decorative spheres as one instanced,
//! alpha-blended draw.
//!
//! # Invariants
//! - The renderer never mutates the scene or the materials.
//! - GPU resources follow the scene lazily: geometry by handle, the
//!   environment and matcap textures by revision.

mod gpu;
mod packing;
mod shaders;

pub use gpu::{DrawStats, WgpuFrame, WgpuRenderer};
