//! Uniforms and render pipelines

use crate::batch::{to_linear, Vertex};
use bytemuck::{Pod, Zeroable};
use overlap_scene::{Camera, PolygonOffset, Scene};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniforms shared by every draw (must match `FrameUniforms` in shader.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _pad0: f32,
    pub light_position: [f32; 3],
    pub light_intensity: f32,
    /// rgb, a = 1 while the light is on
    pub light_color: [f32; 4],
    /// rgb, a = intensity
    pub ambient: [f32; 4],
}

impl FrameUniforms {
    pub fn new(scene: &Scene, camera: &Camera) -> Self {
        let light = &scene.light;
        let mut light_color = to_linear(light.color);
        light_color[3] = if light.node.visible { 1.0 } else { 0.0 };

        let mut ambient = to_linear(scene.ambient.color);
        ambient[3] = scene.ambient.intensity;

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            _pad0: 0.0,
            light_position: light.node.transform.position.to_array(),
            light_intensity: light.intensity,
            light_color,
            ambient,
        }
    }
}

/// How one pipeline rasterizes
struct PipelineSpec<'a> {
    label: &'a str,
    fragment_entry: &'a str,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    blend: wgpu::BlendState,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
    bias: wgpu::DepthBiasState,
}

pub struct ScenePipelines {
    /// Opaque, front faces only
    pub lit: wgpu::RenderPipeline,
    /// Premultiplied, double-sided, no depth writes, pushed back by the brush offset
    pub translucent: wgpu::RenderPipeline,
    pub unlit: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    /// Lines drawn without a depth test
    pub overlay_lines: wgpu::RenderPipeline,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        brush_offset: Option<PolygonOffset>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Frame Bind Group Layout"),
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |spec: PipelineSpec| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(spec.label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(spec.fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(spec.blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: spec.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: spec.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: spec.depth_write,
                    depth_compare: spec.depth_compare,
                    stencil: wgpu::StencilState::default(),
                    bias: spec.bias,
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let lit = build(PipelineSpec {
            label: "Lit Pipeline",
            fragment_entry: "fs_lit",
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            blend: wgpu::BlendState::REPLACE,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
            bias: wgpu::DepthBiasState::default(),
        });

        let translucent = build(PipelineSpec {
            label: "Translucent Pipeline",
            fragment_entry: "fs_lit",
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            blend: wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            bias: depth_bias(brush_offset),
        });

        let unlit = build(PipelineSpec {
            label: "Unlit Pipeline",
            fragment_entry: "fs_unlit",
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            blend: wgpu::BlendState::REPLACE,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
            bias: wgpu::DepthBiasState::default(),
        });

        let lines = build(PipelineSpec {
            label: "Line Pipeline",
            fragment_entry: "fs_unlit",
            topology: wgpu::PrimitiveTopology::LineList,
            cull_mode: None,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
            bias: wgpu::DepthBiasState::default(),
        });

        // Intersection edges are drawn over everything, including the solids they lie on
        let overlay_lines = build(PipelineSpec {
            label: "Overlay Line Pipeline",
            fragment_entry: "fs_unlit",
            topology: wgpu::PrimitiveTopology::LineList,
            cull_mode: None,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::Always,
            bias: wgpu::DepthBiasState::default(),
        });

        Self {
            lit,
            translucent,
            unlit,
            lines,
            overlay_lines,
            frame_bind_group_layout,
        }
    }
}

/// Map a polygon offset onto wgpu's depth bias (positive pushes away from the camera)
pub fn depth_bias(offset: Option<PolygonOffset>) -> wgpu::DepthBiasState {
    match offset {
        Some(offset) => wgpu::DepthBiasState {
            constant: offset.units.ceil() as i32,
            slope_scale: offset.factor,
            clamp: 0.0,
        },
        None => wgpu::DepthBiasState::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_std140_sized() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128);
    }

    #[test]
    fn disabled_light_contributes_nothing() {
        let mut scene = Scene::default();
        let camera = Camera::default();
        assert_eq!(FrameUniforms::new(&scene, &camera).light_color[3], 1.0);

        scene.light.enabled = false;
        scene.light.apply_enabled();
        assert_eq!(FrameUniforms::new(&scene, &camera).light_color[3], 0.0);
    }

    #[test]
    fn brush_offset_becomes_depth_bias() {
        let bias = depth_bias(Some(PolygonOffset {
            factor: 0.2,
            units: 0.2,
        }));
        assert_eq!(bias.constant, 1);
        assert_eq!(bias.slope_scale, 0.2);
        assert_eq!(depth_bias(None), wgpu::DepthBiasState::default());
    }
}
