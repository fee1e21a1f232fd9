use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::driver::{RenderBackend, Resource};
use crate::error::RendererError;
use crate::input::Viewport;
use crate::shader::{OCEAN_FRAGMENT, OCEAN_VERTEX};
use crate::types::GpuPowerPreference;
use crate::uniforms::{UniformBindings, UniformBlock};

use super::context::GpuContext;
use super::pipeline::{ShaderProgram, QUAD_VERTICES};

/// [`RenderBackend`] drawing into a winit window through wgpu.
pub struct GpuBackend {
    context: GpuContext,
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_module: Option<wgpu::ShaderModule>,
    fragment_module: Option<wgpu::ShaderModule>,
    vertex_buffer: Option<wgpu::Buffer>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    bindings: UniformBindings,
}

impl GpuBackend {
    pub fn new(
        window: Arc<Window>,
        initial_size: PhysicalSize<u32>,
        gpu_power: GpuPowerPreference,
    ) -> Result<Self, RendererError> {
        let context = GpuContext::new(window, initial_size, gpu_power)?;
        let program = ShaderProgram::build(
            &context.device,
            context.surface_format,
            OCEAN_VERTEX,
            OCEAN_FRAGMENT,
        )?;

        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vertices"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ocean uniforms"),
            size: u64::from(program.bindings.block_size()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("ocean uniform bind group"),
                layout: &program.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let ShaderProgram {
            pipeline,
            vertex_module,
            fragment_module,
            bindings,
            ..
        } = program;

        Ok(Self {
            context,
            pipeline: Some(pipeline),
            vertex_module: Some(vertex_module),
            fragment_module: Some(fragment_module),
            vertex_buffer: Some(vertex_buffer),
            uniform_buffer,
            uniform_bind_group,
            bindings,
        })
    }

    /// Recovers from a lost or outdated swapchain.
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }
}

impl RenderBackend for GpuBackend {
    fn uniform_bindings(&self) -> &UniformBindings {
        &self.bindings
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.context
            .resize(PhysicalSize::new(viewport.width, viewport.height));
    }

    fn upload_uniforms(&mut self, block: &UniformBlock) {
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, block.as_bytes());
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), RendererError> {
        let (Some(pipeline), Some(vertex_buffer)) =
            (self.pipeline.as_ref(), self.vertex_buffer.as_ref())
        else {
            return Err(RendererError::NotReady("shader program released"));
        };

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("ocean encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ocean pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.draw(0..vertex_count, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn release(&mut self, resource: Resource) {
        match resource {
            Resource::Program => drop(self.pipeline.take()),
            Resource::VertexStage => drop(self.vertex_module.take()),
            Resource::FragmentStage => drop(self.fragment_module.take()),
            Resource::VertexBuffer => {
                if let Some(buffer) = self.vertex_buffer.take() {
                    buffer.destroy();
                }
            }
        }
        tracing::trace!(?resource, "released GPU resource");
    }
}
