//! Asset loading for the scene: font bytes, matcap textures, HDR environment.
//!
//! Every load runs on its own short-lived worker thread and reports exactly
//! one [`AssetEvent`] through the loader's sink. The sink decides how the
//! event reaches the owner of the scene; the desktop app forwards it to the
//! window event loop.

mod decode;
mod loader;

pub use decode::load_blocking;
pub use loader::AssetLoader;

use bubbletext_common::{HdrImage, TextureImage};
use std::path::{Path, PathBuf};

/// Errors from reading or decoding an asset.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("unsupported image format: {0}")]
    Unsupported(PathBuf),
}

/// A single asset to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRequest {
    /// TrueType / OpenType font file, delivered as raw bytes.
    Font(PathBuf),
    /// Matcap texture for slot `index`, decoded to RGBA8.
    MatcapTexture { index: u8, path: PathBuf },
    /// Equirectangular environment map, decoded to RGBA32F.
    Environment(PathBuf),
}

impl AssetRequest {
    pub fn path(&self) -> &Path {
        match self {
            AssetRequest::Font(p) => p,
            AssetRequest::MatcapTexture { path, .. } => path,
            AssetRequest::Environment(p) => p,
        }
    }

    /// Short name used for worker threads and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AssetRequest::Font(_) => "font",
            AssetRequest::MatcapTexture { .. } => "matcap",
            AssetRequest::Environment(_) => "environment",
        }
    }
}

/// Completion of one [`AssetRequest`].
#[derive(Debug, Clone)]
pub enum AssetEvent {
    FontReady { path: PathBuf, bytes: Vec<u8> },
    MatcapReady { index: u8, image: TextureImage },
    EnvironmentReady(HdrImage),
    Failed { request: AssetRequest, error: String },
}

impl AssetEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, AssetEvent::Failed { .. })
    }
}
