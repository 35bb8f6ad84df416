//! Shared types for the bubbletext workspace.
//!
//! Plain data only: identifiers, transforms, CPU-side mesh buffers and decoded
//! images. Nothing in here touches the GPU or the filesystem.

mod image;
mod mesh;
mod types;

pub use image::{HdrImage, TextureImage};
pub use mesh::{Aabb, MeshData};
pub use types::{NodeId, Transform};
