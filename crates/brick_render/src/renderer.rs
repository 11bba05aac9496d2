//! Quad renderer
//!
//! Uploads a [`DrawList`] as two triangles per rectangle and draws it in one
//! render pass that clears to the list's background color.

use brick_core::ecs::Color;
use brick_core::BackendError;

use crate::backend::GpuContext;
use crate::draw_list::DrawList;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

const INITIAL_QUADS: usize = 64;
const VERTICES_PER_QUAD: usize = 6;

pub(crate) struct QuadRenderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    vertices: Vec<Vertex>,
}

impl QuadRenderer {
    pub fn new(gpu: GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Quad Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // quads are emitted in screen space; winding flips with y
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let capacity = INITIAL_QUADS * VERTICES_PER_QUAD;
        let vertex_buffer = create_vertex_buffer(device, capacity);

        Self {
            gpu,
            pipeline,
            vertex_buffer,
            capacity,
            vertices: Vec::with_capacity(capacity),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn draw(&mut self, list: &DrawList) -> Result<(), BackendError> {
        let srgb = self.gpu.config.format.is_srgb();
        fill_vertices(&mut self.vertices, list, srgb);

        if self.vertices.len() > self.capacity {
            self.capacity = self.vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.capacity);
            tracing::debug!(vertices = self.capacity, "grew quad vertex buffer");
        }
        if !self.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        }

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // skip this frame; the next one draws to the new surface
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(BackendError::OutOfMemory),
            Err(err) => {
                tracing::warn!(error = %err, "dropped frame");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Quad Encoder"),
            });

        {
            let [r, g, b, a] = color_components(list.clear_color(), srgb);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quad Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !self.vertices.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertices.len() as u32, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Quad Vertex Buffer"),
        size: (std::mem::size_of::<Vertex>() * vertices) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Rebuild `out` from the list: pixel space to clip space, two triangles per
/// rectangle, submission order preserved.
pub(crate) fn fill_vertices(out: &mut Vec<Vertex>, list: &DrawList, srgb: bool) {
    out.clear();

    let (width, height) = brick_core::Surface::size(list);
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let to_clip = |x: f32, y: f32| [x / w * 2.0 - 1.0, 1.0 - y / h * 2.0];

    for cmd in list.commands() {
        let color = color_components(cmd.color, srgb);
        let tl = to_clip(cmd.rect.x, cmd.rect.y);
        let tr = to_clip(cmd.rect.right(), cmd.rect.y);
        let bl = to_clip(cmd.rect.x, cmd.rect.bottom());
        let br = to_clip(cmd.rect.right(), cmd.rect.bottom());

        for position in [tl, bl, tr, tr, bl, br] {
            out.push(Vertex { position, color });
        }
    }
}

/// sRGB surfaces expect linear input; others take the bytes as-is.
fn color_components(color: Color, srgb: bool) -> [f32; 4] {
    let [r, g, b, a] = color.to_f32_array();
    if srgb {
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
    } else {
        [r, g, b, a]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_core::{Rect, Surface};

    #[test]
    fn full_surface_rect_covers_clip_space() {
        let mut list = DrawList::new(200, 100);
        list.fill_rect(Rect::new(0.0, 0.0, 200.0, 100.0), Color::WHITE);

        let mut out = Vec::new();
        fill_vertices(&mut out, &list, false);

        assert_eq!(out.len(), 6);
        assert_eq!(out[0].position, [-1.0, 1.0]);
        assert_eq!(out[5].position, [1.0, -1.0]);
        assert!(out.iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn y_axis_points_down_in_pixels() {
        let mut list = DrawList::new(100, 100);
        list.fill_rect(Rect::new(50.0, 50.0, 50.0, 50.0), Color::BLACK);

        let mut out = Vec::new();
        fill_vertices(&mut out, &list, false);

        // top-left of the rect sits at the clip-space origin
        assert_eq!(out[0].position, [0.0, 0.0]);
        // bottom-left is lower on screen, so smaller clip y
        assert_eq!(out[1].position, [0.0, -1.0]);
    }

    #[test]
    fn hidpi_window_maps_logical_field_to_full_surface() {
        // 1024x768 window at scale 2 has a 2048x1536 surface
        let (width, height) =
            crate::window::logical_size(winit::dpi::PhysicalSize::new(2048, 1536), 2.0);
        assert_eq!((width, height), (1024, 768));

        let mut list = DrawList::new(width, height);
        list.fill_rect(Rect::new(512.0, 728.0, 200.0, 30.0), Color::WHITE);

        let mut out = Vec::new();
        fill_vertices(&mut out, &list, false);

        assert_eq!(out[0].position[0], 0.0);
        assert_eq!(out[5].position[1], 1.0 - 758.0 / 768.0 * 2.0);
    }

    #[test]
    fn refilling_replaces_previous_vertices() {
        let mut list = DrawList::new(10, 10);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.fill_rect(Rect::new(2.0, 2.0, 1.0, 1.0), Color::WHITE);

        let mut out = Vec::new();
        fill_vertices(&mut out, &list, false);
        assert_eq!(out.len(), 12);

        list.begin(Color::BLACK);
        fill_vertices(&mut out, &list, false);
        assert!(out.is_empty());
    }

    #[test]
    fn srgb_conversion_keeps_endpoints() {
        assert_eq!(color_components(Color::BLACK, true), [0.0, 0.0, 0.0, 1.0]);
        let [r, _, _, a] = color_components(Color::WHITE, true);
        assert!((r - 1.0).abs() < 1e-5);
        assert_eq!(a, 1.0);

        let [mid, _, _, _] = color_components(Color::rgb(128, 128, 128), true);
        assert!(mid < 128.0 / 255.0);
    }
}
