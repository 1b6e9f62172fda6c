//! Overlap Render - wgpu renderer for the editor scene
//!
//! The scene is flattened into world-space vertex batches each frame and
//! drawn with five pipelines: lit, translucent brushes, unlit markers, grid
//! lines and the intersection edge overlay.

pub mod batch;
pub mod context;
pub mod pipeline;
pub mod scene_renderer;

pub use batch::{FrameBatches, Vertex};
pub use context::{RenderContext, RenderError};
pub use pipeline::{FrameUniforms, ScenePipelines, DEPTH_FORMAT};
pub use scene_renderer::{SceneRenderer, SurfaceTarget};
