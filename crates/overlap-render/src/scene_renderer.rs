//! Draws a scene into a color and depth target

use crate::batch::{srgb_channel_to_linear, FrameBatches, Vertex};
use crate::pipeline::{FrameUniforms, ScenePipelines};
use overlap_core::{Color, Result};
use overlap_runtime::FrameRenderer;
use overlap_scene::{Camera, Scene};
use wgpu::util::DeviceExt;

pub struct SceneRenderer {
    pipelines: ScenePipelines,
    uniform_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    last_triangle_count: usize,
}

impl SceneRenderer {
    /// Build pipelines for `format`. The brush depth bias is taken from the scene's brush material.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, scene: &Scene) -> Self {
        let brush_offset = scene
            .materials
            .get(scene.solids.box_solid.brush.material)
            .and_then(|material| material.polygon_offset);
        let pipelines = ScenePipelines::new(device, format, brush_offset);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &pipelines.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Frame Bind Group"),
        });

        Self {
            pipelines,
            uniform_buffer,
            frame_bind_group,
            last_triangle_count: 0,
        }
    }

    pub fn last_triangle_count(&self) -> usize {
        self.last_triangle_count
    }

    /// Encode and submit one scene pass, clearing to the scene's background
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        scene: &Scene,
        camera: &Camera,
    ) {
        let batches = FrameBatches::collect(scene, camera);
        self.last_triangle_count = batches.triangle_count();

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[FrameUniforms::new(scene, camera)]),
        );

        let lines = upload(device, "Grid Vertices", &batches.lines);
        let lit = upload(device, "Lit Vertices", &batches.lit);
        let unlit = upload(device, "Unlit Vertices", &batches.unlit);
        let translucent = upload(device, "Translucent Vertices", &batches.translucent);
        let overlay = upload(device, "Edge Vertices", &batches.overlay_lines);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            // Opaque first, then translucent brushes, then the edge overlay
            let draws = [
                (&self.pipelines.lines, &lines),
                (&self.pipelines.lit, &lit),
                (&self.pipelines.unlit, &unlit),
                (&self.pipelines.translucent, &translucent),
                (&self.pipelines.overlay_lines, &overlay),
            ];
            for (pipeline, batch) in draws {
                let Some((buffer, count)) = batch else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..*count, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Option<(wgpu::Buffer, u32)> {
    if vertices.is_empty() {
        return None;
    }
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    Some((buffer, vertices.len() as u32))
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: srgb_channel_to_linear(color.r) as f64,
        g: srgb_channel_to_linear(color.g) as f64,
        b: srgb_channel_to_linear(color.b) as f64,
        a: color.a as f64,
    }
}

/// One frame's render targets, handed to the editor's render loop
pub struct SurfaceTarget<'a> {
    pub renderer: &'a mut SceneRenderer,
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
}

impl FrameRenderer for SurfaceTarget<'_> {
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.renderer.render(
            self.device,
            self.queue,
            self.color_view,
            self.depth_view,
            scene,
            camera,
        );
        Ok(())
    }
}
