//! Headless evaluation of a single layout

use anyhow::{Context, Result};
use glam::Vec3;
use overlap_csg::MeshEvaluator;
use overlap_runtime::{
    EditorConfig, EvaluationOutcome, EvaluationPipeline, HeadlessRenderer, PendingWork, RenderLoop,
};
use overlap_scene::Scene;
use std::path::PathBuf;

pub struct CheckArgs {
    pub config: Option<PathBuf>,
    pub sphere: Option<[f32; 3]>,
    pub box_position: Option<[f32; 3]>,
    pub box_scale: Option<[f32; 3]>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let config = EditorConfig::load_or_default(args.config.as_deref())?;
    let (scene, outcome) = evaluate(&config, &args)?;

    let sphere = scene.solids.sphere.visual.node.transform.position;
    let box_solid = &scene.solids.box_solid.visual.node.transform;
    println!("Sphere:       {:?}", sphere.to_array());
    println!("Box:          {:?} scale {:?}", box_solid.position.to_array(), box_solid.scale.to_array());
    println!("Intersecting: {}", outcome.intersecting);
    println!("Triangles:    {}", outcome.triangle_count);
    println!("Edges:        {}", outcome.edge_count);
    Ok(())
}

/// Place the solids, then run one frame with a pending evaluation
fn evaluate(config: &EditorConfig, args: &CheckArgs) -> Result<(Scene, EvaluationOutcome)> {
    let mut scene = Scene::new(config.scene_options());
    if let Some(p) = args.sphere {
        scene.solids.sphere.visual.node.transform.position = Vec3::from(p);
    }
    if let Some(p) = args.box_position {
        scene.solids.box_solid.visual.node.transform.position = Vec3::from(p);
    }
    if let Some(s) = args.box_scale {
        scene.solids.box_solid.visual.node.transform.scale = Vec3::from(s);
    }

    let pipeline = EvaluationPipeline::new(Box::new(MeshEvaluator::new()), &mut scene);
    let mut render_loop = RenderLoop::new(pipeline);
    let mut pending = PendingWork::default();
    pending.request();

    let camera = config.build_camera();
    let report = render_loop
        .tick(&mut scene, &camera, &mut pending, &mut HeadlessRenderer::default())
        .context("Evaluation failed")?;
    let outcome = report
        .evaluation
        .context("Frame finished without evaluating")?;
    Ok((scene, outcome))
}
