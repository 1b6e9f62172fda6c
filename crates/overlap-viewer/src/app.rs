//! Viewer application: winit event loop, wgpu scene rendering and the egui overlay

use crate::gizmo::{GizmoFrame, TransformGizmo};
use crate::info_panels::{self, StatusLine};
use crate::keymap::editor_key;
use anyhow::{Context, Result};
use glam::Vec2;
use overlap_csg::MeshEvaluator;
use overlap_render::{RenderContext, RenderError, SceneRenderer, SurfaceTarget};
use overlap_runtime::{Editor, EditorConfig, InputEvent};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Open a window and run the editor until it is closed
pub fn run(config: EditorConfig) -> Result<()> {
    let editor = Editor::new(&config, Box::new(MeshEvaluator::new()))
        .context("Failed to build the editor scene")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config, editor);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct ViewerApp {
    config: EditorConfig,
    editor: Editor,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    scene_renderer: Option<SceneRenderer>,

    // Input state
    pointer: Option<Vec2>,
    left_pressed: bool,
    right_pressed: bool,
    gizmo: TransformGizmo,

    // egui state
    egui_ctx: egui::Context,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,

    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(config: EditorConfig, editor: Editor) -> Self {
        Self {
            config,
            editor,
            window: None,
            render_context: None,
            scene_renderer: None,
            pointer: None,
            left_pressed: false,
            right_pressed: false,
            gizmo: TransformGizmo::new(),
            egui_ctx: egui::Context::default(),
            egui_winit: None,
            egui_renderer: None,
            fatal: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create editor window")?,
        );
        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize render context")?;

        self.editor.handle_input(InputEvent::Resize {
            width: render_context.size.width,
            height: render_context.size.height,
        });

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &render_context.device,
            render_context.format(),
            None,
            1,
            false,
        );

        let scene_renderer =
            SceneRenderer::new(&render_context.device, render_context.format(), &self.editor.scene);

        self.render_context = Some(render_context);
        self.scene_renderer = Some(scene_renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        log::info!("Editor window ready");
        Ok(())
    }

    fn screen_size(&self) -> Vec2 {
        self.editor.viewport()
    }

    /// Gizmo pose for the attached entity
    fn gizmo_frame(&self) -> Option<GizmoFrame> {
        let transform = self.editor.attached_transform()?;
        Some(GizmoFrame::new(
            transform,
            self.editor.widget.mode(),
            self.editor.widget.space(),
        ))
    }

    fn render(&mut self) -> Result<()> {
        let Some(context) = self.render_context.as_mut() else {
            return Ok(());
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::SurfaceError(e.to_string()).into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let Some(renderer) = self.scene_renderer.as_mut() else {
            return Ok(());
        };
        let mut target = SurfaceTarget {
            renderer,
            device: &context.device,
            queue: &context.queue,
            color_view: &view,
            depth_view: &context.depth_view,
        };
        self.editor.frame(&mut target)?;

        self.render_egui(&view);
        output.present();
        Ok(())
    }

    fn render_egui(&mut self, target_view: &wgpu::TextureView) {
        let (Some(window), Some(context), Some(egui_winit), Some(egui_renderer)) = (
            self.window.clone(),
            self.render_context.as_ref(),
            self.egui_winit.as_mut(),
            self.egui_renderer.as_mut(),
        ) else {
            return;
        };

        let raw_input = egui_winit.take_egui_input(&window);

        let editor = &self.editor;
        let gizmo = &self.gizmo;
        let widget_size = editor.widget.size;
        let gizmo_frame = editor.attached_transform().map(|transform| {
            GizmoFrame::new(transform, editor.widget.mode(), editor.widget.space())
        });
        let status = StatusLine {
            mode: editor.widget.mode().label(),
            space: editor.widget.space().label(),
            snapping: editor.widget.translation_snap().is_some(),
            evaluation: editor.last_evaluation(),
        };
        let mut clicked_key = None;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            clicked_key = info_panels::show(ctx, &editor.panels, editor.selection.panel(), &status);

            if let Some(frame) = &gizmo_frame {
                let screen_rect = ctx.screen_rect();
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Foreground,
                    egui::Id::new("transform_gizmo_overlay"),
                ));
                gizmo.draw_overlay(
                    &painter,
                    &editor.camera,
                    Vec2::new(screen_rect.width(), screen_rect.height()),
                    frame,
                    widget_size,
                );
            }
        });

        egui_winit.handle_platform_output(&window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&context.device, &context.queue, *id, image_delta);
        }

        egui_renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        context.queue.submit(std::iter::once(encoder.finish()));

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        // Panel buttons act like pressing their key
        if let Some(key) = clicked_key {
            let pointer = self.pointer.unwrap_or_default();
            self.editor.handle_input(InputEvent::PointerDown {
                x: pointer.x,
                y: pointer.y,
                target_key: Some(key.to_string()),
            });
        }
    }

    fn on_left_pressed(&mut self) {
        let Some(pointer) = self.pointer else {
            return;
        };
        let screen = self.screen_size();
        let size = self.editor.widget.size;

        if let Some(frame) = self.gizmo_frame() {
            let camera = &self.editor.camera;
            if let Some(handle) = self.gizmo.pick(camera, screen, pointer.x, pointer.y, &frame, size) {
                if self
                    .gizmo
                    .begin_drag(handle, camera, screen, pointer.x, pointer.y, &frame, size)
                {
                    self.editor.handle_input(InputEvent::WidgetDragging(true));
                    return;
                }
            }
        }

        self.left_pressed = true;
        self.editor.handle_input(InputEvent::PointerDown {
            x: pointer.x,
            y: pointer.y,
            target_key: None,
        });
    }

    fn on_left_released(&mut self) {
        self.left_pressed = false;
        if self.gizmo.is_dragging() {
            self.gizmo.end_drag();
            self.editor.handle_input(InputEvent::WidgetDragging(false));
        }
    }

    fn on_cursor_moved(&mut self, position: Vec2) {
        let screen = self.screen_size();

        if self.gizmo.is_dragging() {
            let drag = self
                .gizmo
                .drag(&self.editor.camera, screen, position.x, position.y);
            if let Some(drag) = drag {
                self.editor.handle_input(InputEvent::WidgetDrag(drag));
            }
        } else {
            if let Some(last) = self.pointer {
                let delta = position - last;
                if self.left_pressed {
                    self.editor.handle_input(InputEvent::Orbit {
                        dx: delta.x,
                        dy: delta.y,
                    });
                }
                if self.right_pressed {
                    self.editor.handle_input(InputEvent::Pan {
                        dx: delta.x,
                        dy: delta.y,
                    });
                }
            }

            if let Some(frame) = self.gizmo_frame() {
                let size = self.editor.widget.size;
                self.gizmo.update_hover(
                    &self.editor.camera,
                    screen,
                    position.x,
                    position.y,
                    &frame,
                    size,
                );
            } else {
                self.gizmo.hovered = None;
            }
        }

        self.pointer = Some(position);
    }

    /// Keep the gizmo consistent when the selection changed under it
    fn sync_gizmo(&mut self) {
        if self.gizmo.is_dragging() && !self.editor.widget.is_dragging() {
            self.gizmo.end_drag();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to initialize editor: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                }
                if new_size.width > 0 && new_size.height > 0 {
                    self.editor.handle_input(InputEvent::Resize {
                        width: new_size.width,
                        height: new_size.height,
                    });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                let Some(key) = editor_key(&event.logical_key) else {
                    return;
                };
                let input = match event.state {
                    ElementState::Pressed => InputEvent::KeyDown(key),
                    ElementState::Released => InputEvent::KeyUp(key),
                };
                self.editor.handle_input(input);
                self.sync_gizmo();
            }

            WindowEvent::MouseInput { state, button, .. } => match (button, state) {
                (MouseButton::Left, ElementState::Pressed) => {
                    self.on_left_pressed();
                    self.sync_gizmo();
                }
                (MouseButton::Left, ElementState::Released) => self.on_left_released(),
                (MouseButton::Right, state) => {
                    self.right_pressed = state == ElementState::Pressed;
                }
                _ => {}
            },

            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.editor.handle_input(InputEvent::Zoom(scroll));
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    log::error!("Stopping editor: {e:#}");
                    self.fatal = Some(e);
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
