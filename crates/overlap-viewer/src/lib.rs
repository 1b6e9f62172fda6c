//! Overlap Viewer - the interactive editor window
//!
//! Hosts the editor in a winit window, draws the scene with the wgpu
//! renderer and overlays the info panels and transform gizmo with egui.

pub mod app;
pub mod gizmo;
pub mod info_panels;
pub mod keymap;
pub mod projection;

pub use app::run;
