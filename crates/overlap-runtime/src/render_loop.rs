//! Per-frame scheduling
//!
//! The only place that draws. Each tick consumes the pending re-evaluation
//! request, mirrors the light's enabled flag onto its node, then renders once.

use crate::pipeline::{EvaluationOutcome, EvaluationPipeline};
use overlap_core::Result;
use overlap_scene::{Camera, Scene};

/// Anything that can draw a scene from a camera
pub trait FrameRenderer {
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;
}

/// Renderer that draws nothing, for headless runs
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
}

impl FrameRenderer for HeadlessRenderer {
    fn draw(&mut self, _scene: &Scene, _camera: &Camera) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}

/// Request for a re-evaluation before the next frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingWork(bool);

impl PendingWork {
    pub fn request(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    /// Present when this frame re-evaluated the intersection
    pub evaluation: Option<EvaluationOutcome>,
}

pub struct RenderLoop {
    pipeline: EvaluationPipeline,
    frame: u64,
}

impl RenderLoop {
    pub fn new(pipeline: EvaluationPipeline) -> Self {
        Self { pipeline, frame: 0 }
    }

    pub fn pipeline(&self) -> &EvaluationPipeline {
        &self.pipeline
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Establish the initial intersection state before the first frame
    pub fn prime(&mut self, scene: &mut Scene) -> Result<EvaluationOutcome> {
        self.pipeline.prime(scene)
    }

    pub fn tick(
        &mut self,
        scene: &mut Scene,
        camera: &Camera,
        pending: &mut PendingWork,
        renderer: &mut dyn FrameRenderer,
    ) -> Result<FrameReport> {
        let evaluation = if pending.take() {
            Some(self.pipeline.update(scene)?)
        } else {
            None
        };

        scene.light.apply_enabled();
        renderer.draw(scene, camera)?;
        self.frame += 1;

        Ok(FrameReport {
            frame: self.frame,
            evaluation,
        })
    }
}
