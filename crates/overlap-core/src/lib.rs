//! Overlap Core - Foundational types for the overlap editor
//!
//! This crate provides the types that every other overlap crate depends on:
//! - `Transform`, `Color` - Spatial and presentation types
//! - `EntityKind`, `SolidKind` - Explicit tags for editable scene entities
//! - `TransformMode`, `TransformSpace` - Transform widget state
//! - Error types and Result alias

mod error;
mod kind;
mod types;

pub use error::{OverlapError, Result};
pub use kind::{EntityKind, SolidKind, TransformMode, TransformSpace};
pub use types::{Color, Transform};

pub use glam::{EulerRot, Mat4, Quat, Vec3};
