//! Rendering adapter: renderer-agnostic interface, camera and viewport.
//!
//! # Invariants
//! - Renderers read the scene and materials; they never mutate them.
//! - Camera motion lives outside the scene graph.
//! - The render pixel ratio never exceeds [`MAX_PIXEL_RATIO`].

mod camera;
mod renderer;
mod viewport;

pub use camera::OrbitCamera;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use viewport::{MAX_PIXEL_RATIO, Viewport, ViewportChange};
