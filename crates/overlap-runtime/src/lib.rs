//! Overlap Runtime - the editor core
//!
//! - `Editor` - application state driven by input events and frame ticks
//! - `interpret` - turns platform input into `EditorCommand`s
//! - `Selection` / `TransformWidget` - what is being edited and how
//! - `EvaluationPipeline` - sync, evaluate, remap materials, swap visibility
//! - `RenderLoop` - consumes pending work and draws through a `FrameRenderer`
//! - `EditorConfig` - TOML configuration with environment overrides

mod config;
mod editor;
mod input;
mod panels;
mod picking;
mod pipeline;
mod render_loop;
mod selection;
mod sync;
mod widget;

pub use config::{
    CameraConfig, EditorConfig, SceneConfig, SnapConfig, WidgetConfig, WindowConfig,
};
pub use editor::Editor;
pub use input::{interpret, key_down_commands, EditorCommand, InputContext, InputEvent, Key};
pub use panels::{InfoPanel, KeyButton, PanelId, Panels, DISABLED_CLASS};
pub use picking::{pick, pick_at, pointer_to_ndc, ray_triangle, LIGHT_PICK_RADIUS};
pub use pipeline::{EvaluationOutcome, EvaluationPipeline};
pub use render_loop::{FrameRenderer, FrameReport, HeadlessRenderer, PendingWork, RenderLoop};
pub use selection::Selection;
pub use sync::{synchronize, synchronize_scene};
pub use widget::{SnapIncrements, TransformWidget, WidgetDrag};
